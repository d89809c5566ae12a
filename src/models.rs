use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use std::fmt;

// ============ Document Models ============

/// Average rating a single company gave a vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRating {
    /// Identifier of the rating company.
    #[serde(deserialize_with = "null_as_default")]
    pub company_id: String,
    /// Average rating from that company.
    #[serde(deserialize_with = "null_as_default")]
    pub avg_rating: f64,
}

/// Rating aggregated across every company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalRatings {
    #[serde(deserialize_with = "null_as_default")]
    pub avg_rating: f64,
}

/// Operational metrics for a vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalMetrics {
    /// Fraction of successful engagements.
    #[serde(deserialize_with = "null_as_default")]
    pub success_rate: f64,
    /// Average response time in milliseconds. Stored as Int32 when it fits.
    #[serde(
        deserialize_with = "null_as_default",
        serialize_with = "serialize_compact_int"
    )]
    pub avg_response_time: i64,
}

/// A vendor document as accepted over HTTP and written to the collection.
///
/// Decoding is structural only: omitted or `null` fields take their zero
/// value and unknown fields are ignored. Nothing here checks ranges or
/// uniqueness. Use [`decode_vendor`] for request bodies so key matching
/// follows the same rules as the rest of the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vendor {
    /// Caller-supplied identifier, echoed back on creation.
    #[serde(deserialize_with = "null_as_default")]
    pub vendor_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_items_as_default")]
    pub company_wise_ratings: Vec<CompanyRating>,
    #[serde(deserialize_with = "null_as_default")]
    pub global_ratings: GlobalRatings,
    #[serde(deserialize_with = "null_as_default")]
    pub global_metrics: GlobalMetrics,
    #[serde(deserialize_with = "null_as_default")]
    pub trust_score: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_items_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}

fn serialize_compact_int<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match i32::try_from(*value) {
        Ok(small) => serializer.serialize_i32(small),
        Err(_) => serializer.serialize_i64(*value),
    }
}

// ============ Request Decoding ============

/// Decodes a request body into a [`Vendor`].
///
/// Only the first JSON value in the body is read. Object keys match field
/// names case-insensitively and the last occurrence of a key wins. A
/// top-level `null` decodes to an empty vendor.
pub fn decode_vendor(body: &[u8]) -> Result<Vendor, serde_json::Error> {
    let FoldedValue(value) = serde_json::Deserializer::from_slice(body)
        .into_iter::<FoldedValue>()
        .next()
        .unwrap_or_else(|| Err(de::Error::custom("EOF")))?;

    match value {
        Value::Null => Ok(Vendor::default()),
        Value::Object(_) => Vendor::deserialize(value),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a JSON object")),
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
        Value::Null => de::Unexpected::Unit,
    }
}

/// A JSON value whose object keys were lowercased while parsing.
struct FoldedValue(Value);

impl<'de> Deserialize<'de> for FoldedValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FoldedVisitor).map(FoldedValue)
    }
}

struct FoldedVisitor;

impl<'de> Visitor<'de> for FoldedVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        FoldedValue::deserialize(deserializer).map(|folded| folded.0)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(FoldedValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = Map::new();
        while let Some((key, FoldedValue(value))) = map.next_entry::<String, FoldedValue>()? {
            // Later keys overwrite earlier ones, including differently-cased duplicates.
            object.insert(key.to_lowercase(), value);
        }
        Ok(Value::Object(object))
    }
}

// ============ API Response Models ============

/// Body returned by `POST /api/vendor` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreated {
    pub message: String,
    /// Identifier the store generated for the new document.
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
    pub vendor_id: String,
}

impl VendorCreated {
    pub fn new(inserted_id: String, vendor_id: String) -> Self {
        Self {
            message: "Vendor created successfully".to_string(),
            inserted_id,
            vendor_id,
        }
    }
}
