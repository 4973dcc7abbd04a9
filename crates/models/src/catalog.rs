//! Catalog domain records as they travel over the wire and sit in JSON
//! documents.
//!
//! The same shapes are stored by every backend; the relational entities in
//! [`crate::product`] and friends convert to and from these.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Image shown for products stored without one.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/400";

/// Fresh identifier for a newly added record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Visibility of a product in public listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Published,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Published => "published",
            ProductStatus::Archived => "archived",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "published" => Ok(ProductStatus::Published),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(ModelError::Validation(format!("invalid status '{other}'"))),
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price as submitted by a form: either a JSON number or its text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn is_blank(&self) -> bool {
        matches!(self, PriceInput::Text(s) if s.trim().is_empty())
    }

    /// Parse into a finite floating point value.
    pub fn to_price(&self) -> Result<f64, ModelError> {
        let value = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ModelError::Validation(format!("price '{s}' is not a number")))?,
        };
        if !value.is_finite() {
            return Err(ModelError::Validation("price must be a finite number".into()));
        }
        Ok(value)
    }
}

impl From<f64> for PriceInput {
    fn from(v: f64) -> Self { PriceInput::Number(v) }
}

impl From<&str> for PriceInput {
    fn from(v: &str) -> Self { PriceInput::Text(v.to_string()) }
}

/// Optional prices treat `null` and blank text alike.
pub fn optional_price(input: Option<&PriceInput>) -> Result<Option<f64>, ModelError> {
    match input {
        None => Ok(None),
        Some(p) if p.is_blank() => Ok(None),
        Some(p) => p.to_price().map(Some),
    }
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Merge a single `tagId` and a `tagIds` list into one ordered, de-duplicated list.
pub fn merge_tag_ids(single: Option<String>, many: Option<Vec<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in many.into_iter().flatten().chain(single) {
        let t = t.trim().to_string();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredProduct")]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Carton (CTN) price.
    pub price: f64,
    /// Per-piece (PCS) price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcs_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    pub supplier_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub category_id: Option<String>,
    pub status: ProductStatus,
}

impl Product {
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Published
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRefs {
    One(String),
    Many(Vec<String>),
}

fn tag_refs<'de, D>(d: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagRefs>::deserialize(d)?.map(|refs| match refs {
        TagRefs::One(s) => vec![s],
        TagRefs::Many(v) => v,
    }))
}

/// Lenient on-disk shape: older documents carry `tagId`, textual prices or
/// no status at all.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProduct {
    id: String,
    #[serde(default)]
    title: String,
    price: PriceInput,
    #[serde(default)]
    pcs_price: Option<PriceInput>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    supplier_id: Option<String>,
    #[serde(default, deserialize_with = "tag_refs")]
    tag_id: Option<Vec<String>>,
    #[serde(default, deserialize_with = "tag_refs")]
    tag_ids: Option<Vec<String>>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    status: Option<ProductStatus>,
}

impl TryFrom<StoredProduct> for Product {
    type Error = ModelError;

    fn try_from(s: StoredProduct) -> Result<Self, Self::Error> {
        let mut tags = s.tag_ids.unwrap_or_default();
        tags.extend(s.tag_id.unwrap_or_default());
        Ok(Product {
            id: s.id,
            title: s.title,
            price: s.price.to_price()?,
            pcs_price: optional_price(s.pcs_price.as_ref())?,
            description: s.description,
            image: blank_to_none(s.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            supplier_id: blank_to_none(s.supplier_id),
            tag_ids: merge_tag_ids(None, Some(tags)),
            category_id: blank_to_none(s.category_id),
            status: s.status.unwrap_or_default(),
        })
    }
}

/// Input for adding a product. Also the body of a full update (see [`ProductUpdate`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub price: PriceInput,
    #[serde(default)]
    pub pcs_price: Option<PriceInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

impl NewProduct {
    pub fn new(title: impl Into<String>, price: impl Into<PriceInput>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            pcs_price: None,
            description: None,
            image: None,
            supplier_id: None,
            tag_id: None,
            tag_ids: None,
            category_id: None,
            status: None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("title required".into()));
        }
        if self.price.is_blank() {
            return Err(ModelError::Validation("price required".into()));
        }
        self.price.to_price()?;
        optional_price(self.pcs_price.as_ref())?;
        Ok(())
    }

    /// Build the stored record. A missing status becomes `fallback_status`.
    pub fn into_product(self, id: String, fallback_status: ProductStatus) -> Result<Product, ModelError> {
        self.validate()?;
        Ok(Product {
            id,
            title: self.title.trim().to_string(),
            price: self.price.to_price()?,
            pcs_price: optional_price(self.pcs_price.as_ref())?,
            description: blank_to_none(self.description),
            image: blank_to_none(self.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            supplier_id: blank_to_none(self.supplier_id),
            tag_ids: merge_tag_ids(self.tag_id, self.tag_ids),
            category_id: blank_to_none(self.category_id),
            status: self.status.unwrap_or(fallback_status),
        })
    }
}

/// Full replacement of a product keyed by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: NewProduct,
}

/// Supplier, tag and category share this shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
    pub name: String,
}

pub type Supplier = NamedEntity;
pub type Tag = NamedEntity;
pub type Category = NamedEntity;

impl NamedEntity {
    pub fn new(name: &str) -> Self {
        Self { id: new_id(), name: name.trim().to_string() }
    }

    /// Names collide when equal ignoring case and surrounding whitespace.
    pub fn same_name(&self, other: &Self) -> bool {
        names_match(&self.name, &other.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salesperson {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl Salesperson {
    pub fn new(name: &str, phone: &str) -> Self {
        Self { id: new_id(), name: name.trim().to_string(), phone: phone.trim().to_string() }
    }

    /// Either the name (ignoring case) or the phone number is already taken.
    pub fn collides_with(&self, other: &Self) -> bool {
        names_match(&self.name, &other.name) || self.phone.trim() == other.phone.trim()
    }
}

pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn textual_price_is_parsed() {
        let input: NewProduct = serde_json::from_value(json!({"title": "Widget", "price": "1500.50"})).unwrap();
        let p = input.into_product("p1".into(), ProductStatus::Published).unwrap();
        assert_eq!(p.price, 1500.5);
        assert_eq!(p.status, ProductStatus::Published);
        assert_eq!(p.image, PLACEHOLDER_IMAGE);
        assert!(p.tag_ids.is_empty());
    }

    #[test]
    fn garbage_price_is_rejected() {
        let input = NewProduct::new("Widget", "12abc");
        assert!(matches!(input.validate(), Err(ModelError::Validation(_))));
        let blank = NewProduct::new("Widget", "  ");
        assert!(blank.validate().is_err());
    }

    #[test]
    fn blank_pcs_price_means_unset() {
        let mut input = NewProduct::new("Box", 10.0);
        input.pcs_price = Some("".into());
        let p = input.into_product("b".into(), ProductStatus::Published).unwrap();
        assert_eq!(p.pcs_price, None);
    }

    #[test]
    fn tag_inputs_are_merged() {
        let input: NewProduct = serde_json::from_value(json!({
            "title": "Mug", "price": 3, "tagId": "t2", "tagIds": ["t1", "t2", " "]
        }))
        .unwrap();
        let p = input.into_product("m".into(), ProductStatus::Published).unwrap();
        assert_eq!(p.tag_ids, vec!["t1".to_string(), "t2".to_string()]);
    }

    #[test]
    fn legacy_document_is_read_leniently() {
        let p: Product = serde_json::from_value(json!({
            "id": "1712345678901",
            "title": "Old",
            "price": "99.9",
            "description": "from the first version",
            "tagId": "t9",
            "supplierId": ""
        }))
        .unwrap();
        assert_eq!(p.price, 99.9);
        assert_eq!(p.tag_ids, vec!["t9".to_string()]);
        assert_eq!(p.supplier_id, None);
        assert_eq!(p.status, ProductStatus::Published);
        assert_eq!(p.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn product_serializes_camel_case() {
        let mut input = NewProduct::new("Crate", 100.0);
        input.pcs_price = Some(5.0.into());
        input.category_id = Some("c1".into());
        let p = input.into_product("x".into(), ProductStatus::Archived).unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["pcsPrice"], json!(5.0));
        assert_eq!(v["categoryId"], json!("c1"));
        assert_eq!(v["status"], json!("archived"));
        assert_eq!(v["tagIds"], json!([]));
        assert!(v.get("description").is_none());
    }

    #[test]
    fn update_body_flattens_fields() {
        let upd: ProductUpdate = serde_json::from_value(json!({
            "id": "abc", "title": "Renamed", "price": 7
        }))
        .unwrap();
        assert_eq!(upd.id, "abc");
        assert_eq!(upd.fields.title, "Renamed");
        assert_eq!(upd.fields.price.to_price().unwrap(), 7.0);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Archived".parse::<ProductStatus>().unwrap(), ProductStatus::Archived);
        assert!("hidden".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn name_collisions_ignore_case() {
        let a = NamedEntity::new("Acme");
        let b = NamedEntity::new("  aCME ");
        assert!(a.same_name(&b));
        let s1 = Salesperson::new("Wahid", "62895346372918");
        let s2 = Salesperson::new("Someone Else", "62895346372918");
        assert!(s1.collides_with(&s2));
        assert!(!s1.collides_with(&Salesperson::new("Other", "1")));
    }
}
