use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use uuid::{Builder, Uuid};

/// Number of hex characters kept from a v4 UUID for a new id.
pub const SHORT_ID_LEN: usize = 8;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Id<T> {
    pub id: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    /// Creates a fresh short id from a random v4 UUID.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Creates a fresh short id whose UUID bytes are drawn from `rng`, so seeded
    /// generators produce the same ids on every run.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self::from_uuid(Builder::from_random_bytes(bytes).into_uuid())
    }

    fn from_uuid(uuid: Uuid) -> Self {
        let mut id = uuid.simple().to_string();
        id.truncate(SHORT_ID_LEN);
        Id::new(id)
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.id.trim().is_empty()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(id_wrapper: Id<T>) -> Self {
        id_wrapper.id
    }
}

impl<T> From<&str> for Id<T> {
    fn from(id: &str) -> Self {
        Id::new(id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

// Ids travel as plain strings on the serialization boundary.
impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Id::new)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TaskTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct PrecedenceTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct LinkTag;

pub type TaskId = Id<TaskTag>;
pub type PrecedenceId = Id<PrecedenceTag>;
pub type NodeId = Id<NodeTag>;
pub type LinkId = Id<LinkTag>;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_ids_are_short_hex() {
        let id = TaskId::generate();
        assert_eq!(id.as_str().len(), SHORT_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);

        let a: Vec<NodeId> = (0..5).map(|_| NodeId::generate_with(&mut rng_a)).collect();
        let b: Vec<NodeId> = (0..5).map(|_| NodeId::generate_with(&mut rng_b)).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = LinkId::new("a<->b");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a<->b\"");

        let back: LinkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_debug_uses_tag_name() {
        let id = TaskId::new("abc");
        assert_eq!(format!("{:?}", id), "TaskId: \"abc\"");
    }
}
