use sea_orm::{entity::prelude::*, Set};

use crate::catalog::Salesperson;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salespeople")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Salesperson {
    fn from(m: Model) -> Self {
        Salesperson { id: m.id, name: m.name, phone: m.phone }
    }
}

impl From<&Salesperson> for ActiveModel {
    fn from(s: &Salesperson) -> Self {
        ActiveModel { id: Set(s.id.clone()), name: Set(s.name.clone()), phone: Set(s.phone.clone()) }
    }
}
