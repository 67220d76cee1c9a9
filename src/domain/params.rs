// Creation parameters in the target catalog's vocabulary. Descriptor enums are
// translated here so the cloners never pass source spellings to the catalog.

use crate::domain::model::{
    Cardinality, DomainFieldType, DomainKind, MergePolicy, Notification, ShapeType, SplitPolicy,
};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $keyword:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $keyword)] $variant),+
        }

        impl $name {
            pub fn keyword(&self) -> &'static str {
                match self {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        }
    };
}

keyword_enum!(GeometryKeyword {
    Point => "POINT",
    Multipoint => "MULTIPOINT",
    Polyline => "POLYLINE",
    Polygon => "POLYGON",
    Multipatch => "MULTIPATCH",
});

keyword_enum!(DomainTypeKeyword {
    Coded => "CODED",
    Range => "RANGE",
});

keyword_enum!(FieldTypeKeyword {
    Short => "SHORT",
    Long => "LONG",
    Float => "FLOAT",
    Double => "DOUBLE",
    Text => "TEXT",
    Date => "DATE",
});

keyword_enum!(SplitPolicyKeyword {
    Default => "DEFAULT",
    Duplicate => "DUPLICATE",
    GeometryRatio => "GEOMETRY_RATIO",
});

keyword_enum!(MergePolicyKeyword {
    AreaWeighted => "AREA_WEIGHTED",
    Default => "DEFAULT",
    SumValues => "SUM_VALUES",
});

keyword_enum!(RelationshipTypeKeyword {
    Simple => "SIMPLE",
    Composite => "COMPOSITE",
});

keyword_enum!(MessageDirection {
    None => "NONE",
    Forward => "FORWARD",
    Back => "BACK",
    Both => "BOTH",
});

keyword_enum!(CardinalityKeyword {
    OneToOne => "ONE_TO_ONE",
    OneToMany => "ONE_TO_MANY",
    ManyToMany => "MANY_TO_MANY",
});

impl GeometryKeyword {
    /// `None` for an undefined shape type.
    pub fn from_shape(shape: ShapeType) -> Option<Self> {
        match shape {
            ShapeType::Point => Some(GeometryKeyword::Point),
            ShapeType::Multipoint => Some(GeometryKeyword::Multipoint),
            ShapeType::Polyline => Some(GeometryKeyword::Polyline),
            ShapeType::Polygon => Some(GeometryKeyword::Polygon),
            ShapeType::Multipatch => Some(GeometryKeyword::Multipatch),
            ShapeType::Any => None,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            GeometryKeyword::Point => ShapeType::Point,
            GeometryKeyword::Multipoint => ShapeType::Multipoint,
            GeometryKeyword::Polyline => ShapeType::Polyline,
            GeometryKeyword::Polygon => ShapeType::Polygon,
            GeometryKeyword::Multipatch => ShapeType::Multipatch,
        }
    }
}

impl From<DomainKind> for DomainTypeKeyword {
    fn from(kind: DomainKind) -> Self {
        match kind {
            DomainKind::CodedValue => DomainTypeKeyword::Coded,
            DomainKind::Range => DomainTypeKeyword::Range,
        }
    }
}

impl From<DomainTypeKeyword> for DomainKind {
    fn from(keyword: DomainTypeKeyword) -> Self {
        match keyword {
            DomainTypeKeyword::Coded => DomainKind::CodedValue,
            DomainTypeKeyword::Range => DomainKind::Range,
        }
    }
}

impl From<DomainFieldType> for FieldTypeKeyword {
    fn from(field_type: DomainFieldType) -> Self {
        match field_type {
            DomainFieldType::Short => FieldTypeKeyword::Short,
            DomainFieldType::Long => FieldTypeKeyword::Long,
            DomainFieldType::Float => FieldTypeKeyword::Float,
            DomainFieldType::Double => FieldTypeKeyword::Double,
            DomainFieldType::Text => FieldTypeKeyword::Text,
            DomainFieldType::Date => FieldTypeKeyword::Date,
        }
    }
}

impl From<FieldTypeKeyword> for DomainFieldType {
    fn from(keyword: FieldTypeKeyword) -> Self {
        match keyword {
            FieldTypeKeyword::Short => DomainFieldType::Short,
            FieldTypeKeyword::Long => DomainFieldType::Long,
            FieldTypeKeyword::Float => DomainFieldType::Float,
            FieldTypeKeyword::Double => DomainFieldType::Double,
            FieldTypeKeyword::Text => DomainFieldType::Text,
            FieldTypeKeyword::Date => DomainFieldType::Date,
        }
    }
}

impl From<SplitPolicy> for SplitPolicyKeyword {
    fn from(policy: SplitPolicy) -> Self {
        match policy {
            SplitPolicy::DefaultValue => SplitPolicyKeyword::Default,
            SplitPolicy::Duplicate => SplitPolicyKeyword::Duplicate,
            SplitPolicy::GeometryRatio => SplitPolicyKeyword::GeometryRatio,
        }
    }
}

impl From<SplitPolicyKeyword> for SplitPolicy {
    fn from(keyword: SplitPolicyKeyword) -> Self {
        match keyword {
            SplitPolicyKeyword::Default => SplitPolicy::DefaultValue,
            SplitPolicyKeyword::Duplicate => SplitPolicy::Duplicate,
            SplitPolicyKeyword::GeometryRatio => SplitPolicy::GeometryRatio,
        }
    }
}

impl From<MergePolicy> for MergePolicyKeyword {
    fn from(policy: MergePolicy) -> Self {
        match policy {
            MergePolicy::AreaWeighted => MergePolicyKeyword::AreaWeighted,
            MergePolicy::DefaultValue => MergePolicyKeyword::Default,
            MergePolicy::SumValues => MergePolicyKeyword::SumValues,
        }
    }
}

impl From<MergePolicyKeyword> for MergePolicy {
    fn from(keyword: MergePolicyKeyword) -> Self {
        match keyword {
            MergePolicyKeyword::AreaWeighted => MergePolicy::AreaWeighted,
            MergePolicyKeyword::Default => MergePolicy::DefaultValue,
            MergePolicyKeyword::SumValues => MergePolicy::SumValues,
        }
    }
}

impl RelationshipTypeKeyword {
    pub fn from_composite(is_composite: bool) -> Self {
        if is_composite {
            RelationshipTypeKeyword::Composite
        } else {
            RelationshipTypeKeyword::Simple
        }
    }
}

impl From<Notification> for MessageDirection {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::None => MessageDirection::None,
            Notification::Forward => MessageDirection::Forward,
            Notification::Backward => MessageDirection::Back,
            Notification::Both => MessageDirection::Both,
        }
    }
}

impl From<MessageDirection> for Notification {
    fn from(direction: MessageDirection) -> Self {
        match direction {
            MessageDirection::None => Notification::None,
            MessageDirection::Forward => Notification::Forward,
            MessageDirection::Back => Notification::Backward,
            MessageDirection::Both => Notification::Both,
        }
    }
}

impl From<Cardinality> for CardinalityKeyword {
    fn from(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::OneToOne => CardinalityKeyword::OneToOne,
            Cardinality::OneToMany => CardinalityKeyword::OneToMany,
            Cardinality::ManyToMany => CardinalityKeyword::ManyToMany,
        }
    }
}

impl From<CardinalityKeyword> for Cardinality {
    fn from(keyword: CardinalityKeyword) -> Self {
        match keyword {
            CardinalityKeyword::OneToOne => Cardinality::OneToOne,
            CardinalityKeyword::OneToMany => Cardinality::OneToMany,
            CardinalityKeyword::ManyToMany => Cardinality::ManyToMany,
        }
    }
}

/// Template-driven properties (M/Z, spatial reference) follow the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateProperty {
    #[serde(rename = "SAME_AS_TEMPLATE")]
    SameAsTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureClassParams {
    pub catalog_path: String,
    pub name: String,
    pub geometry: GeometryKeyword,
    /// Source dataset path used as the schema template.
    pub template: String,
    pub has_m: TemplateProperty,
    pub has_z: TemplateProperty,
    /// Dataset whose spatial reference is inherited.
    pub spatial_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableParams {
    pub catalog_path: String,
    pub name: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainParams {
    pub catalog_path: String,
    pub name: String,
    pub description: String,
    pub field_type: FieldTypeKeyword,
    pub domain_type: DomainTypeKeyword,
    pub split_policy: SplitPolicyKeyword,
    pub merge_policy: MergePolicyKeyword,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipClassParams {
    pub origin_table: String,
    pub destination_table: String,
    /// Full output path: `<target catalog>/<name>`.
    pub out_path: String,
    pub relationship_type: RelationshipTypeKeyword,
    pub forward_label: String,
    pub backward_label: String,
    pub message_direction: MessageDirection,
    pub cardinality: CardinalityKeyword,
    pub attributed: bool,
    pub origin_primary_key: String,
    pub origin_foreign_key: String,
    pub destination_primary_key: Option<String>,
    pub destination_foreign_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_maps_backward_to_back() {
        assert_eq!(MessageDirection::from(Notification::Backward).keyword(), "BACK");
        assert_eq!(MessageDirection::from(Notification::None).keyword(), "NONE");
    }

    #[test]
    fn test_undefined_shape_has_no_geometry_keyword() {
        assert_eq!(GeometryKeyword::from_shape(ShapeType::Any), None);
        assert_eq!(
            GeometryKeyword::from_shape(ShapeType::Polygon).map(|g| g.keyword()),
            Some("POLYGON")
        );
    }

    #[test]
    fn test_keywords_serialize_in_catalog_vocabulary() {
        let json = serde_json::to_string(&SplitPolicyKeyword::GeometryRatio).unwrap();
        assert_eq!(json, "\"GEOMETRY_RATIO\"");
        assert_eq!(MergePolicyKeyword::from(MergePolicy::DefaultValue).to_string(), "DEFAULT");
        assert_eq!(RelationshipTypeKeyword::from_composite(true).keyword(), "COMPOSITE");
    }
}
