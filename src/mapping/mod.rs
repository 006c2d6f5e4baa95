//! Logical sort keys and the storage fields behind them

pub mod registry;

pub use registry::{
    MappingEntry, MappingTable, PropertyMapping, PropertyMappingRegistry,
    PropertyMappingRegistryBuilder,
};
