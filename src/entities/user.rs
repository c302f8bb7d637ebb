use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::watched::Entity")]
    Watched,
}

impl Related<super::watched::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Watched.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
