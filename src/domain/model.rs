use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Separator between a catalog path and the dataset name inside it.
pub const PATH_SEPARATOR: char = '/';

pub fn join_path(catalog_path: &str, name: &str) -> String {
    format!(
        "{}{}{}",
        catalog_path.trim_end_matches(PATH_SEPARATOR),
        PATH_SEPARATOR,
        name
    )
}

/// Splits `<catalog>/<name>` at the last separator.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once(PATH_SEPARATOR)
        .filter(|(catalog, name)| !catalog.is_empty() && !name.is_empty())
}

/// Strips owner/database qualification: `db.owner.Parcels` -> `Parcels`.
pub fn unqualified_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub catalog_path: String,
    #[serde(flatten)]
    pub kind: DatasetKind,
}

impl DatasetDescriptor {
    pub fn unqualified_name(&self) -> &str {
        unqualified_name(&self.name)
    }

    /// Full path of the dataset in its own catalog, usable as a template.
    pub fn source_path(&self) -> String {
        join_path(&self.catalog_path, &self.name)
    }

    pub fn data_type(&self) -> &str {
        self.kind.data_type()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            DatasetKind::FeatureClass(fc) => &fc.fields,
            DatasetKind::Table(table) => &table.fields,
            DatasetKind::RelationshipClass(rel) => &rel.fields,
            DatasetKind::Other { .. } => &[],
        }
    }
}

/// Dataset type, stored as a `kind` tag next to the type's own properties.
///
/// Any tag other than the three cloneable kinds reads as `Other`, so one
/// raster or topology entry does not make the whole catalog unreadable.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetKind {
    FeatureClass(FeatureClassDescriptor),
    Table(TableDescriptor),
    RelationshipClass(RelationshipClassDescriptor),
    Other { data_type: String },
}

#[derive(Serialize)]
#[serde(tag = "kind")]
enum TaggedKindRef<'a> {
    FeatureClass(&'a FeatureClassDescriptor),
    Table(&'a TableDescriptor),
    RelationshipClass(&'a RelationshipClassDescriptor),
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum TaggedKind {
    FeatureClass(FeatureClassDescriptor),
    Table(TableDescriptor),
    RelationshipClass(RelationshipClassDescriptor),
}

#[derive(Serialize)]
struct OtherKind<'a> {
    kind: &'a str,
}

impl Serialize for DatasetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DatasetKind::FeatureClass(fc) => TaggedKindRef::FeatureClass(fc).serialize(serializer),
            DatasetKind::Table(table) => TaggedKindRef::Table(table).serialize(serializer),
            DatasetKind::RelationshipClass(rel) => {
                TaggedKindRef::RelationshipClass(rel).serialize(serializer)
            }
            DatasetKind::Other { data_type } => OtherKind { kind: data_type }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DatasetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| <D::Error as de::Error>::missing_field("kind"))?;

        match kind {
            "FeatureClass" | "Table" | "RelationshipClass" => {
                let tagged: TaggedKind = serde_json::from_value(value)
                    .map_err(<D::Error as de::Error>::custom)?;
                Ok(match tagged {
                    TaggedKind::FeatureClass(fc) => DatasetKind::FeatureClass(fc),
                    TaggedKind::Table(table) => DatasetKind::Table(table),
                    TaggedKind::RelationshipClass(rel) => DatasetKind::RelationshipClass(rel),
                })
            }
            other => Ok(DatasetKind::Other {
                data_type: other.to_string(),
            }),
        }
    }
}

impl DatasetKind {
    pub fn data_type(&self) -> &str {
        match self {
            DatasetKind::FeatureClass(_) => "FeatureClass",
            DatasetKind::Table(_) => "Table",
            DatasetKind::RelationshipClass(_) => "RelationshipClass",
            DatasetKind::Other { data_type } => data_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Point,
    Multipoint,
    Polyline,
    Polygon,
    Multipatch,
    /// No geometry type defined; cannot be used as a template.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Simple,
    Annotation,
    Dimension,
    CoverageAnnotation,
    RasterCatalogItem,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureClassDescriptor {
    pub shape_type: ShapeType,
    #[serde(default = "simple_feature_type")]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub has_m: bool,
    #[serde(default)]
    pub has_z: bool,
    #[serde(default)]
    pub spatial_reference: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

fn simple_feature_type() -> FeatureType {
    FeatureType::Simple
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "OID")]
    Oid,
    #[serde(rename = "GlobalID")]
    GlobalId,
    Geometry,
    SmallInteger,
    Integer,
    Single,
    Double,
    String,
    Date,
    #[serde(rename = "GUID")]
    Guid,
    Blob,
    Raster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainFieldType {
    Short,
    Long,
    Float,
    Double,
    Text,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainKind {
    CodedValue,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPolicy {
    DefaultValue,
    Duplicate,
    GeometryRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergePolicy {
    AreaWeighted,
    DefaultValue,
    SumValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub field_type: DomainFieldType,
    pub domain_type: DomainKind,
    #[serde(default = "default_split")]
    pub split_policy: SplitPolicy,
    #[serde(default = "default_merge")]
    pub merge_policy: MergePolicy,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coded_values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

fn default_split() -> SplitPolicy {
    SplitPolicy::DefaultValue
}

fn default_merge() -> MergePolicy {
    MergePolicy::DefaultValue
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    None,
    Forward,
    Backward,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub primary: String,
    pub foreign: String,
}

impl KeyPair {
    pub fn new(primary: impl Into<String>, foreign: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            foreign: foreign.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRule {
    #[serde(default)]
    pub origin_subtype: Option<i32>,
    #[serde(default)]
    pub destination_subtype: Option<i32>,
    #[serde(default)]
    pub origin_minimum: u32,
    #[serde(default)]
    pub origin_maximum: u32,
    #[serde(default)]
    pub destination_minimum: u32,
    #[serde(default)]
    pub destination_maximum: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipClassDescriptor {
    pub origin_class_names: Vec<String>,
    pub destination_class_names: Vec<String>,
    #[serde(default)]
    pub is_composite: bool,
    #[serde(default)]
    pub forward_path_label: String,
    #[serde(default)]
    pub backward_path_label: String,
    pub notification: Notification,
    pub cardinality: Cardinality,
    #[serde(default)]
    pub is_attributed: bool,
    pub origin_keys: KeyPair,
    #[serde(default)]
    pub destination_keys: Option<KeyPair>,
    #[serde(default)]
    pub relationship_rules: Vec<RelationshipRule>,
    /// Attribute table fields; only meaningful when attributed.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RelationshipClassDescriptor {
    pub fn origin_table(&self) -> Option<&str> {
        self.origin_class_names
            .first()
            .map(|name| unqualified_name(name))
    }

    pub fn destination_table(&self) -> Option<&str> {
        self.destination_class_names
            .first()
            .map(|name| unqualified_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unqualified_name_strips_owner_prefix() {
        assert_eq!(unqualified_name("gis.owner.Parcels"), "Parcels");
        assert_eq!(unqualified_name("Parcels"), "Parcels");
    }

    #[test]
    fn test_split_and_join_path() {
        let path = join_path("data/source.json/", "owner.Parcels");
        assert_eq!(path, "data/source.json/owner.Parcels");
        assert_eq!(split_path(&path), Some(("data/source.json", "owner.Parcels")));
        assert_eq!(split_path("Parcels"), None);
        assert_eq!(split_path("catalog/"), None);
    }

    #[test]
    fn test_dataset_descriptor_from_json() {
        let json = serde_json::json!({
            "name": "owner.Parcels",
            "kind": "FeatureClass",
            "shape_type": "Polygon",
            "fields": [
                {"name": "OBJECTID", "type": "OID"},
                {"name": "ZONE", "type": "String", "domain": "Zoning"}
            ]
        });
        let desc: DatasetDescriptor = serde_json::from_value(json).unwrap();

        assert_eq!(desc.unqualified_name(), "Parcels");
        assert_eq!(desc.data_type(), "FeatureClass");
        assert_eq!(desc.fields()[1].domain.as_deref(), Some("Zoning"));
        match desc.kind {
            DatasetKind::FeatureClass(fc) => {
                assert_eq!(fc.shape_type, ShapeType::Polygon);
                assert_eq!(fc.feature_type, FeatureType::Simple);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_kind_reads_as_other() {
        let json = serde_json::json!({
            "name": "Elevation",
            "kind": "RasterDataset",
            "bands": 3
        });
        let desc: DatasetDescriptor = serde_json::from_value(json).unwrap();

        assert_eq!(desc.data_type(), "RasterDataset");
        assert!(desc.fields().is_empty());

        let written = serde_json::to_value(&desc).unwrap();
        assert_eq!(written, serde_json::json!({"name": "Elevation", "kind": "RasterDataset"}));
    }

    #[test]
    fn test_known_kind_with_bad_properties_is_an_error() {
        let json = serde_json::json!({"name": "Parcels", "kind": "FeatureClass"});
        assert!(serde_json::from_value::<DatasetDescriptor>(json).is_err());
    }

    #[test]
    fn test_unknown_feature_type_maps_to_other() {
        let ft: FeatureType = serde_json::from_str("\"Dimensionless\"").unwrap();
        assert_eq!(ft, FeatureType::Other);
    }

    #[test]
    fn test_relationship_endpoints_use_first_name() {
        let rel = RelationshipClassDescriptor {
            origin_class_names: vec!["gis.owner.Parcels".to_string(), "Extra".to_string()],
            destination_class_names: vec![],
            is_composite: false,
            forward_path_label: String::new(),
            backward_path_label: String::new(),
            notification: Notification::None,
            cardinality: Cardinality::OneToMany,
            is_attributed: false,
            origin_keys: KeyPair::new("GlobalID", "ParcelGUID"),
            destination_keys: None,
            relationship_rules: vec![],
            fields: vec![],
        };
        assert_eq!(rel.origin_table(), Some("Parcels"));
        assert_eq!(rel.destination_table(), None);
    }
}
