//! Memory profiling support for hierarchy-build benchmarks.
//!
//! Provides a Linux resident-set sampler plus report helpers that compute
//! memory-per-triangle and memory-per-cluster metrics for benchmark runs.

mod memory_sampler;

use std::{
    fs,
    path::{Path, PathBuf},
};

pub use memory_sampler::{PeakRssMeasurement, measure_peak_resident_set_size};
use thiserror::Error;

/// Validates whether the observed leaf-cluster count is within expected
/// scaling bounds of `triangle_count / max_triangles_per_cluster`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClusterScalingBounds {
    lower_multiplier: usize,
    upper_multiplier: usize,
}

impl ClusterScalingBounds {
    /// Creates scaling bounds expressed as multiplicative tolerances.
    ///
    /// `lower_multiplier = 8` means the measured cluster count is accepted
    /// when it is at least `expected / 8`.
    #[must_use]
    pub const fn new(lower_multiplier: usize, upper_multiplier: usize) -> Self {
        Self {
            lower_multiplier,
            upper_multiplier,
        }
    }

    #[must_use]
    const fn lower_multiplier(self) -> usize {
        self.lower_multiplier
    }

    #[must_use]
    const fn upper_multiplier(self) -> usize {
        self.upper_multiplier
    }
}

impl Default for ClusterScalingBounds {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

/// Errors raised while sampling or reporting benchmark memory metrics.
#[derive(Debug, Error)]
pub enum ProfilingError {
    /// Any input/output failure while reading process information or writing reports.
    #[error("profiling I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The `/proc/self/status` parser could not locate a required key.
    #[error("missing field `{field}` in /proc/self/status")]
    MissingProcField {
        /// The required field name.
        field: &'static str,
    },
    /// A numeric field in `/proc/self/status` could not be parsed.
    #[error("invalid numeric value `{value}` for /proc field `{field}`")]
    InvalidProcField {
        /// The required field name.
        field: &'static str,
        /// The unparseable value.
        value: String,
    },
    /// A process status field had an unexpected unit.
    #[error("unsupported unit `{unit}` for /proc field `{field}`")]
    UnsupportedProcUnit {
        /// The required field name.
        field: &'static str,
        /// The unit found in `/proc`.
        unit: String,
    },
    /// Sampling is unavailable on the current operating system.
    #[error("peak resident-set sampling is not supported on `{os}`")]
    UnsupportedPlatform {
        /// Name of the unsupported operating system.
        os: &'static str,
    },
    /// A denominator was zero while deriving memory metrics.
    #[error("cannot compute metric because `{context}` is zero")]
    ZeroDenominator {
        /// Name of the zero denominator.
        context: &'static str,
    },
    /// Arithmetic overflow occurred while deriving or validating metrics.
    #[error("arithmetic overflow while computing `{context}`")]
    Overflow {
        /// Name of the overflowed calculation.
        context: &'static str,
    },
    /// The peak-memory sampler thread failed to join successfully.
    #[error("failed to join peak-memory sampler thread")]
    SamplerThreadPanicked,
    /// The peak-memory sampler encountered poisoned shared state.
    #[error("peak-memory sampler lock was poisoned")]
    SamplerLockPoisoned,
    /// Sampling interval must be greater than zero.
    #[error("sampling interval must be greater than zero")]
    ZeroSamplingInterval,
}

/// Input payload used to construct a [`ClusterBuildMemoryRecord`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClusterBuildMemoryInput {
    /// Number of triangles in the source mesh.
    pub triangle_count: usize,
    /// Configured `max_triangles_per_cluster` hard cap.
    pub max_triangles_per_cluster: usize,
    /// Measured elapsed time and peak memory delta from baseline.
    pub measurement: PeakRssMeasurement,
    /// Number of clusters produced at level 0 (leaves).
    pub leaf_cluster_count: usize,
    /// Total number of clusters produced across every level.
    pub total_cluster_count: usize,
}

/// Single row in the hierarchy-build memory profile report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClusterBuildMemoryRecord {
    triangle_count: usize,
    max_triangles_per_cluster: usize,
    elapsed_millis: u128,
    peak_rss_bytes: u64,
    leaf_cluster_count: usize,
    total_cluster_count: usize,
    expected_leaf_clusters: usize,
    cluster_scaling_ok: bool,
    cluster_deviation: usize,
    memory_per_triangle_bytes: u64,
    memory_per_cluster_bytes: u64,
}

impl ClusterBuildMemoryRecord {
    /// Builds a report row from measured hierarchy-build stats.
    ///
    /// # Errors
    ///
    /// Returns [`ProfilingError`] when cluster-count expectations overflow,
    /// metric denominators are zero, or scaling bounds are invalid.
    pub fn new(
        input: ClusterBuildMemoryInput,
        bounds: ClusterScalingBounds,
    ) -> Result<Self, ProfilingError> {
        let expected_leaf_clusters = expected_leaf_cluster_count(
            input.triangle_count,
            input.max_triangles_per_cluster,
        )?;
        let memory_per_triangle_bytes = divide_metric(
            input.measurement.peak_rss_bytes,
            input.triangle_count,
            "triangle_count",
        )?;
        let memory_per_cluster_bytes = divide_metric(
            input.measurement.peak_rss_bytes,
            input.total_cluster_count,
            "total_cluster_count",
        )?;
        let (cluster_scaling_ok, cluster_deviation) = validate_cluster_scaling(
            input.leaf_cluster_count,
            expected_leaf_clusters,
            bounds,
        )?;

        Ok(Self {
            triangle_count: input.triangle_count,
            max_triangles_per_cluster: input.max_triangles_per_cluster,
            elapsed_millis: input.measurement.elapsed.as_millis(),
            peak_rss_bytes: input.measurement.peak_rss_bytes,
            leaf_cluster_count: input.leaf_cluster_count,
            total_cluster_count: input.total_cluster_count,
            expected_leaf_clusters,
            cluster_scaling_ok,
            cluster_deviation,
            memory_per_triangle_bytes,
            memory_per_cluster_bytes,
        })
    }

    const fn csv_header() -> &'static str {
        concat!(
            "triangle_count,max_triangles_per_cluster,elapsed_ms,peak_rss_bytes,",
            "memory_per_triangle_bytes,leaf_cluster_count,total_cluster_count,",
            "memory_per_cluster_bytes,expected_leaf_clusters,",
            "cluster_scaling_ok,cluster_deviation\n",
        )
    }

    fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            self.triangle_count,
            self.max_triangles_per_cluster,
            self.elapsed_millis,
            self.peak_rss_bytes,
            self.memory_per_triangle_bytes,
            self.leaf_cluster_count,
            self.total_cluster_count,
            self.memory_per_cluster_bytes,
            self.expected_leaf_clusters,
            self.cluster_scaling_ok,
            self.cluster_deviation,
        )
    }
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "Metrics are intentionally truncated to whole bytes after a non-zero denominator check."
)]
fn divide_metric(
    numerator: u64,
    denominator: usize,
    context: &'static str,
) -> Result<u64, ProfilingError> {
    if denominator == 0 {
        return Err(ProfilingError::ZeroDenominator { context });
    }
    let denominator_u64 = u64::try_from(denominator).map_err(|_| ProfilingError::Overflow {
        context: "usize_to_u64_denominator",
    })?;
    Ok(numerator / denominator_u64)
}

#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "leaf-cluster count estimate intentionally rounds up via the ceiling-division idiom"
)]
fn expected_leaf_cluster_count(
    triangle_count: usize,
    max_triangles_per_cluster: usize,
) -> Result<usize, ProfilingError> {
    if max_triangles_per_cluster == 0 {
        return Err(ProfilingError::ZeroDenominator {
            context: "max_triangles_per_cluster",
        });
    }
    let numerator = triangle_count
        .checked_add(max_triangles_per_cluster - 1)
        .ok_or(ProfilingError::Overflow {
            context: "expected_leaf_clusters_numerator",
        })?;
    Ok(numerator / max_triangles_per_cluster)
}

fn validate_cluster_scaling(
    leaf_cluster_count: usize,
    expected_leaf_clusters: usize,
    bounds: ClusterScalingBounds,
) -> Result<(bool, usize), ProfilingError> {
    if bounds.lower_multiplier() == 0 {
        return Err(ProfilingError::ZeroDenominator {
            context: "lower_multiplier",
        });
    }
    if bounds.upper_multiplier() == 0 {
        return Err(ProfilingError::ZeroDenominator {
            context: "upper_multiplier",
        });
    }
    let lower_scale = leaf_cluster_count
        .checked_mul(bounds.lower_multiplier())
        .ok_or(ProfilingError::Overflow {
            context: "lower_scaled_cluster_count",
        })?;
    let upper_bound = expected_leaf_clusters
        .checked_mul(bounds.upper_multiplier())
        .ok_or(ProfilingError::Overflow {
            context: "upper_bound_clusters",
        })?;
    let scaling_ok = lower_scale >= expected_leaf_clusters && leaf_cluster_count <= upper_bound;
    Ok((scaling_ok, leaf_cluster_count.abs_diff(expected_leaf_clusters)))
}

/// Writes hierarchy-build memory profiling records to a comma-separated
/// report file.
///
/// # Errors
///
/// Returns [`ProfilingError`] when creating the parent directory or writing
/// the report file fails.
pub fn write_memory_report(
    report_path: impl AsRef<Path>,
    records: &[ClusterBuildMemoryRecord],
) -> Result<PathBuf, ProfilingError> {
    let report_file_path = report_path.as_ref().to_path_buf();
    if let Some(parent) = report_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut output = String::from(ClusterBuildMemoryRecord::csv_header());
    for record in records {
        output.push_str(&record.to_csv_row());
    }
    fs::write(&report_file_path, output)?;
    Ok(report_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::{fs, time::Duration};

    #[derive(Debug)]
    struct ScalingCase {
        peak_rss_bytes: u64,
        triangle_count: usize,
        max_triangles_per_cluster: usize,
        leaf_cluster_count: usize,
        expected_scaling: bool,
    }

    fn measurement(bytes: u64, millis: u64) -> PeakRssMeasurement {
        PeakRssMeasurement {
            elapsed: Duration::from_millis(millis),
            peak_rss_bytes: bytes,
        }
    }

    #[rstest]
    #[case::balanced(ScalingCase {
        peak_rss_bytes: 3_200,
        triangle_count: 1_600,
        max_triangles_per_cluster: 128,
        leaf_cluster_count: 13,
        expected_scaling: true,
    })]
    #[case::too_sparse(ScalingCase {
        peak_rss_bytes: 3_200,
        triangle_count: 1_600,
        max_triangles_per_cluster: 128,
        leaf_cluster_count: 1,
        expected_scaling: false,
    })]
    #[case::too_dense(ScalingCase {
        peak_rss_bytes: 3_200,
        triangle_count: 1_600,
        max_triangles_per_cluster: 128,
        leaf_cluster_count: 500,
        expected_scaling: false,
    })]
    fn memory_record_reports_cluster_scaling(#[case] case: ScalingCase) {
        let record = ClusterBuildMemoryRecord::new(
            ClusterBuildMemoryInput {
                triangle_count: case.triangle_count,
                max_triangles_per_cluster: case.max_triangles_per_cluster,
                measurement: measurement(case.peak_rss_bytes, 17),
                leaf_cluster_count: case.leaf_cluster_count,
                total_cluster_count: case.leaf_cluster_count + 1,
            },
            ClusterScalingBounds::default(),
        )
        .expect("valid scaling case must build");
        assert_eq!(record.cluster_scaling_ok, case.expected_scaling);
    }

    #[rstest]
    #[case::zero_triangles(0, 10, "triangle_count")]
    fn memory_record_rejects_zero_denominators(
        #[case] triangle_count: usize,
        #[case] leaf_cluster_count: usize,
        #[case] expected_context: &'static str,
    ) {
        let err = ClusterBuildMemoryRecord::new(
            ClusterBuildMemoryInput {
                triangle_count,
                max_triangles_per_cluster: 128,
                measurement: measurement(8_000, 10),
                leaf_cluster_count,
                total_cluster_count: leaf_cluster_count + 1,
            },
            ClusterScalingBounds::default(),
        )
        .expect_err("zero denominator must fail");
        assert!(matches!(
            err,
            ProfilingError::ZeroDenominator { context } if context == expected_context
        ));
    }

    #[rstest]
    fn write_memory_report_persists_header_and_rows() {
        let temp_path = std::env::temp_dir().join("cluster_hierarchy_memory_profile_report_test.csv");
        let records = vec![
            ClusterBuildMemoryRecord::new(
                ClusterBuildMemoryInput {
                    triangle_count: 2_048,
                    max_triangles_per_cluster: 128,
                    measurement: measurement(10_000, 9),
                    leaf_cluster_count: 20,
                    total_cluster_count: 26,
                },
                ClusterScalingBounds::default(),
            )
            .expect("record must build"),
        ];
        let written_path =
            write_memory_report(&temp_path, &records).expect("report write must succeed");
        let contents = fs::read_to_string(&written_path).expect("report must be readable");
        assert!(contents.starts_with("triangle_count,max_triangles_per_cluster"));
        assert!(contents.contains('\n'));
        fs::remove_file(written_path).expect("temp report cleanup must succeed");
    }
}
