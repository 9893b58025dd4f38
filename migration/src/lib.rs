use sea_orm_migration::prelude::*;
pub use sea_orm_migration::prelude::{MigrationTrait, MigratorTrait};

mod m20250301_101500_create_tables;
mod m20250415_162200_add_wishlist;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_101500_create_tables::Migration),
            Box::new(m20250415_162200_add_wishlist::Migration),
        ]
    }
}
