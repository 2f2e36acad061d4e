use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{HashMap, Map, TreeMap};

fn serialize_entries<'a, K, V, I, S>(
    entries: I,
    len: usize,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(len))?;

    for (k, v) in entries {
        map.serialize_key(k)?;
        map.serialize_value(v)?;
    }

    map.end()
}

impl<K: Serialize, V: Serialize, H> Serialize for HashMap<K, V, H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(self.iter(), self.len(), serializer)
    }
}

impl<K: Serialize, V: Serialize> Serialize for TreeMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(self.iter(), self.len(), serializer)
    }
}

/// Builds any [`Map`] from a serde map, refusing repeated keys.
struct MapVisitor<M, K, V> {
    marker: PhantomData<fn() -> (M, K, V)>,
}

impl<M, K, V> MapVisitor<M, K, V> {
    fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<'de, M, K, V> Visitor<'de> for MapVisitor<M, K, V>
where
    M: Map<K, V>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = M;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map with unique keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<M, A::Error> {
        let mut map = M::new();

        while let Some((key, value)) = access.next_entry()? {
            map.try_add(key, value).map_err(de::Error::custom)?;
        }

        Ok(map)
    }
}

impl<'de, K, V, H> Deserialize<'de> for HashMap<K, V, H>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
    H: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

impl<'de, K, V> Deserialize<'de> for TreeMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor::new())
    }
}
