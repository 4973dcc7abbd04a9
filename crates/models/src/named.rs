//! Shared plumbing for the `{id, name}` tables (suppliers, tags, categories).

use sea_orm::EntityTrait;

use crate::catalog::NamedEntity;

/// A table whose rows are plain [`NamedEntity`] records.
pub trait NamedTable: EntityTrait {
    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn to_active(record: &NamedEntity) -> Self::ActiveModel;
    fn to_record(model: Self::Model) -> NamedEntity;
}

macro_rules! impl_named_table {
    ($module:ident) => {
        impl $crate::named::NamedTable for $crate::$module::Entity {
            fn id_column() -> Self::Column { $crate::$module::Column::Id }
            fn name_column() -> Self::Column { $crate::$module::Column::Name }
            fn to_active(record: &$crate::catalog::NamedEntity) -> Self::ActiveModel {
                $crate::$module::ActiveModel {
                    id: sea_orm::Set(record.id.clone()),
                    name: sea_orm::Set(record.name.clone()),
                }
            }
            fn to_record(model: Self::Model) -> $crate::catalog::NamedEntity {
                $crate::catalog::NamedEntity { id: model.id, name: model.name }
            }
        }
    };
}

impl_named_table!(supplier);
impl_named_table!(tag);
impl_named_table!(category);
