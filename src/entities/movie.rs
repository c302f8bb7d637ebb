use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub release_timestamp: f64,
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
