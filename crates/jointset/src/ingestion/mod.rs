//! Measurement ingestion: CSV / XLSX reading and cleaning

mod table;

pub use table::{
    IngestionStats, MeasurementTable, TableFormat, TableReader, DIP_ANGLE_COLUMN,
    DIP_DIRECTION_COLUMN,
};
