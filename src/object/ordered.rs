use super::Object;
use indexmap::IndexMap;
use std::iter::FromIterator;

/// String-keyed map that iterates in insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap(IndexMap<String, Object>);

impl OrderedMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwriting an existing key keeps its original position.
    pub fn insert(&mut self, key: String, value: Object) -> Option<Object> {
        self.0.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.0.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.0.iter()
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).map_or(false, |v| v == value))
    }
}

impl FromIterator<(String, Object)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (String, Object)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Set of values keyed by their string form, iterating in insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet(IndexMap<String, Object>);

impl OrderedSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &Object) -> bool {
        self.0.contains_key(&value.key_string())
    }

    /// Returns false when an equal member was already present.
    pub fn insert(&mut self, value: Object) -> bool {
        let key = value.key_string();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    pub fn remove(&mut self, value: &Object) -> bool {
        self.0.shift_remove(&value.key_string()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.0.values()
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.keys().all(|k| other.0.contains_key(k))
    }
}

impl FromIterator<Object> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = OrderedMap::new();
        for key in ["zeta", "alpha", "mid"].iter() {
            map.insert((*key).to_owned(), Object::Integer(key.len() as i64));
        }
        map.insert("alpha".to_owned(), Object::Integer(0));

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha"), Some(&Object::Integer(0)));

        map.insert("last".to_owned(), Object::Nil);
        assert_eq!(map.remove("zeta"), Some(Object::Integer(4)));
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "last"]);
        assert_eq!(map.remove("zeta"), None);
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a: OrderedMap = vec![
            ("a".to_owned(), Object::Integer(1)),
            ("b".to_owned(), Object::Integer(2)),
        ]
        .into_iter()
        .collect();
        let b: OrderedMap = vec![
            ("b".to_owned(), Object::Integer(2)),
            ("a".to_owned(), Object::Integer(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_membership_by_string_form() {
        let mut set = OrderedSet::new();
        assert!(set.insert(Object::Integer(3)));
        assert!(set.insert(Object::from("x")));
        assert!(!set.insert(Object::Integer(3)));
        assert!(!set.insert(Object::from("3")));
        assert_eq!(set.len(), 2);

        let members: Vec<String> = set.iter().map(Object::to_string).collect();
        assert_eq!(members, vec!["3", "x"]);

        assert!(set.insert(Object::Integer(7)));
        assert!(set.remove(&Object::Integer(3)));
        assert!(!set.contains(&Object::Integer(3)));
        assert!(!set.remove(&Object::Integer(3)));
        let members: Vec<String> = set.iter().map(Object::to_string).collect();
        assert_eq!(members, vec!["x", "7"]);
    }
}
