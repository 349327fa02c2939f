pub use sea_orm_migration::prelude::*;

pub(crate) mod datatype;

mod m20260901_000001_initial;
mod m20260915_000002_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_initial::Migration),
            Box::new(m20260915_000002_lookup_indexes::Migration),
        ]
    }
}
