use super::List;

use serde::de::{Deserialize, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde::Deserializer;

use std::fmt;
use std::marker::PhantomData;

pub struct ListVisitor<T> {
    marker: PhantomData<fn() -> List<T>>,
}

impl<T> ListVisitor<T> {
    fn new() -> Self {
        ListVisitor {
            marker: PhantomData,
        }
    }
}

impl<'de, T> Visitor<'de> for ListVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = List<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a List")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element()? {
            values.push(value);
        }
        Ok(values.into_iter().collect())
    }
}

impl<'de, T> Deserialize<'de> for List<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ListVisitor::<T>::new())
    }
}

impl<T> Serialize for List<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod serde_test {
    use crate::List;

    use serde_test::{assert_tokens, Token};

    #[test]
    fn serde_list() {
        let list: List<i32> = [2, -6].into_iter().collect();
        assert_tokens(
            &list,
            &[
                Token::Seq { len: Some(2) },
                Token::I32(2),
                Token::I32(-6),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn serde_empty_list() {
        let list: List<u64> = List::new();
        assert_tokens(&list, &[Token::Seq { len: Some(0) }, Token::SeqEnd]);
    }
}
