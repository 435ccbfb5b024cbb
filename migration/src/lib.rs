pub use sea_orm_migration::prelude::*;

mod m20260105_100000_create_schema;
mod m20260105_100100_create_enums;
mod m20260105_100200_create_tables;
mod m20260105_100300_add_sorting_indexes;
mod m20260105_100400_add_initial_admin_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_100000_create_schema::Migration),
            Box::new(m20260105_100100_create_enums::Migration),
            Box::new(m20260105_100200_create_tables::Migration),
            Box::new(m20260105_100300_add_sorting_indexes::Migration),
            Box::new(m20260105_100400_add_initial_admin_user::Migration),
        ]
    }
}
