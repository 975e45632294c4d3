pub mod db;
pub mod memory;

pub use db::PgBookStore;
pub use memory::MemoryBookStore;
