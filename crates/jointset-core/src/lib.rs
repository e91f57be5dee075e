//! jointset-core: classify joint orientations into joint sets
//!
//! Each (dip direction, dip angle) measurement is encoded as the unit pole of
//! its plane, and the poles are partitioned with seeded, multi-restart
//! k-means. The result is one opaque set label per input row, in input order,
//! plus diagnostics and per-set summaries for reporting collaborators.
//!
//! ```
//! use jointset_core::{cluster, Measurement};
//!
//! let ms = vec![
//!     Measurement::new(90.0, 45.0),
//!     Measurement::new(92.0, 44.0),
//!     Measurement::new(270.0, 46.0),
//!     Measurement::new(268.0, 45.0),
//! ];
//! let labels = cluster(&ms, 2, Some(42)).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

pub mod classifier;
pub mod error;
pub mod orientation;
pub mod summary;

pub use classifier::{
    cluster, cluster_with, ClassifierConfig, ClusteringDiagnostics, JointSetClustering, KMeans,
    KMeansFit, LabelOrder, QualityWarning,
};
pub use error::{JointSetError, Result};
pub use orientation::{decode, encode, encode_all, Measurement};
pub use summary::{summarize, JointSetSummary};
