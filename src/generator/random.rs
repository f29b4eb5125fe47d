//! Seeded random instance generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ConfigurationError, Instance, InstanceData, TimeWindow};

/// Parameters for [`generate`].
///
/// Every range is an inclusive `(min, max)` pair sampled uniformly.
///
/// # Examples
///
/// ```
/// use u_vrptw::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_num_customers(25)
///     .with_fleet_size(5)
///     .with_capacity(80);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of customers `n`.
    pub num_customers: usize,
    /// Number of vehicles. Identifiers are `0..fleet_size`.
    pub fleet_size: usize,
    /// Shared vehicle capacity.
    pub capacity: i32,
    /// Travel cost per arc.
    pub cost_range: (f64, f64),
    /// Travel time per arc.
    pub travel_time_range: (f64, f64),
    /// Demand per customer.
    pub demand_range: (i32, i32),
    /// End of the planning horizon; depots are open over `[0, horizon]`.
    pub horizon: f64,
    /// Width of each customer window.
    pub window_width_range: (f64, f64),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_customers: 10,
            fleet_size: 3,
            capacity: 50,
            cost_range: (1.0, 100.0),
            travel_time_range: (1.0, 30.0),
            demand_range: (1, 20),
            horizon: 240.0,
            window_width_range: (30.0, 120.0),
        }
    }
}

impl GeneratorConfig {
    pub fn with_num_customers(mut self, n: usize) -> Self {
        self.num_customers = n;
        self
    }

    pub fn with_fleet_size(mut self, k: usize) -> Self {
        self.fleet_size = k;
        self
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_cost_range(mut self, min: f64, max: f64) -> Self {
        self.cost_range = (min, max);
        self
    }

    pub fn with_travel_time_range(mut self, min: f64, max: f64) -> Self {
        self.travel_time_range = (min, max);
        self
    }

    pub fn with_demand_range(mut self, min: i32, max: i32) -> Self {
        self.demand_range = (min, max);
        self
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_window_width_range(mut self, min: f64, max: f64) -> Self {
        self.window_width_range = (min, max);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.num_customers == 0 {
            return Err(invalid("num_customers", "must be at least 1".to_string()));
        }
        if self.fleet_size == 0 {
            return Err(ConfigurationError::EmptyFleet);
        }
        if self.capacity <= 0 {
            return Err(ConfigurationError::NonPositiveCapacity {
                capacity: self.capacity,
            });
        }
        check_range("cost_range", self.cost_range, 0.0)?;
        check_range("travel_time_range", self.travel_time_range, 0.0)?;
        let (dmin, dmax) = self.demand_range;
        if dmin < 1 || dmin > dmax {
            return Err(invalid(
                "demand_range",
                format!("expected 1 <= min <= max, got ({dmin}, {dmax})"),
            ));
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(invalid(
                "horizon",
                format!("must be finite and positive, got {}", self.horizon),
            ));
        }
        check_range("window_width_range", self.window_width_range, f64::MIN_POSITIVE)?;
        if self.window_width_range.1 > self.horizon {
            return Err(invalid(
                "window_width_range",
                format!(
                    "max width {} exceeds horizon {}",
                    self.window_width_range.1, self.horizon
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigurationError {
    ConfigurationError::InvalidParameter { name, reason }
}

fn check_range(name: &'static str, (min, max): (f64, f64), floor: f64) -> Result<(), ConfigurationError> {
    if !min.is_finite() || !max.is_finite() || min < floor || min > max {
        return Err(invalid(
            name,
            format!("expected finite {floor} <= min <= max, got ({min}, {max})"),
        ));
    }
    Ok(())
}

/// Generates a random instance. The same `seed` always yields the same
/// instance.
///
/// Node `0` and node `n + 1` share a location: travel between them is free
/// and every customer sees identical arcs to and from either depot.
/// Customer windows are `[s, s + w]` with `w` drawn from
/// `window_width_range` and `s` uniform in `[0, horizon - w]`.
///
/// # Examples
///
/// ```
/// use u_vrptw::generator::{generate, GeneratorConfig};
///
/// let config = GeneratorConfig::default().with_num_customers(8);
/// let a = generate(&config, 42).unwrap();
/// let b = generate(&config, 42).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.num_nodes(), 10);
/// ```
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Instance, ConfigurationError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let n = config.num_customers;
    let size = n + 2;

    let cost = random_rows(&mut rng, size, config.cost_range);
    let time = random_rows(&mut rng, size, config.travel_time_range);

    let (dmin, dmax) = config.demand_range;
    let demands: Vec<i32> = (0..n).map(|_| rng.random_range(dmin..=dmax)).collect();

    let depot_window = TimeWindow::new(0.0, config.horizon)
        .ok_or_else(|| invalid("horizon", "cannot form a depot window".to_string()))?;
    let (wmin, wmax) = config.window_width_range;
    let mut windows = Vec::with_capacity(size);
    windows.push(depot_window);
    for customer in 1..=n {
        let width = rng.random_range(wmin..=wmax);
        let start = rng.random_range(0.0..=config.horizon - width);
        let window = TimeWindow::new(start, start + width).ok_or(
            ConfigurationError::InvalidTimeWindow {
                node: customer,
                start,
                end: start + width,
            },
        )?;
        windows.push(window);
    }
    windows.push(depot_window);

    debug!(customers = n, fleet = config.fleet_size, seed, "generated instance");

    Instance::new(InstanceData {
        vehicles: (0..config.fleet_size).collect(),
        capacity: config.capacity,
        demands,
        cost,
        time,
        windows,
    })
}

/// Square matrix with uniform off-diagonal entries, where the last node
/// mirrors node `0`.
fn random_rows<R: Rng>(rng: &mut R, size: usize, (min, max): (f64, f64)) -> Vec<Vec<f64>> {
    let end = size - 1;
    let mut rows = vec![vec![0.0; size]; size];
    for (i, row) in rows.iter_mut().enumerate().take(end) {
        for (j, cell) in row.iter_mut().enumerate().take(end) {
            if i != j {
                *cell = rng.random_range(min..=max);
            }
        }
    }
    for i in 1..end {
        rows[i][end] = rows[i][0];
        rows[end][i] = rows[0][i];
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_same_seed_same_instance() {
        let config = GeneratorConfig::default();
        assert_eq!(generate(&config, 7), generate(&config, 7));
        assert_ne!(
            generate(&config, 7).expect("valid"),
            generate(&config, 8).expect("valid")
        );
    }

    #[test]
    fn test_generated_shape() {
        let config = GeneratorConfig::default()
            .with_num_customers(15)
            .with_fleet_size(4)
            .with_capacity(60);
        let inst = generate(&config, 3).expect("valid");
        assert_eq!(inst.num_customers(), 15);
        assert_eq!(inst.fleet_size(), 4);
        assert_eq!(inst.vehicles(), &[0, 1, 2, 3]);
        assert_eq!(inst.capacity(), 60);
        assert_eq!(inst.horizon(), 240.0);
    }

    #[test]
    fn test_generated_values_in_range() {
        let config = GeneratorConfig::default().with_num_customers(20);
        let inst = generate(&config, 11).expect("valid");
        let end = inst.end_depot();

        for c in inst.customers() {
            let d = inst.demand(c);
            assert!((1..=20).contains(&d));
            let w = inst.window(c);
            assert!(w.start() >= 0.0);
            assert!(w.end() <= 240.0 + 1e-9);
            let width = w.end() - w.start();
            assert!((30.0 - 1e-9..=120.0 + 1e-9).contains(&width));
        }
        for i in inst.nodes() {
            for j in inst.nodes() {
                let c = inst.cost(i, j);
                if i == j || (inst.is_depot(i) && inst.is_depot(j)) {
                    assert_eq!(c, 0.0);
                } else {
                    assert!((1.0..=100.0).contains(&c), "cost[{i}][{j}] = {c}");
                }
            }
        }
        for c in inst.customers() {
            assert_eq!(inst.cost(c, end), inst.cost(c, 0));
            assert_eq!(inst.time(end, c), inst.time(0, c));
        }
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = GeneratorConfig::default();
        assert!(base.clone().with_num_customers(0).validate().is_err());
        assert_eq!(
            base.clone().with_fleet_size(0).validate(),
            Err(ConfigurationError::EmptyFleet)
        );
        assert!(base.clone().with_capacity(0).validate().is_err());
        assert!(base.clone().with_cost_range(5.0, 1.0).validate().is_err());
        assert!(base.clone().with_travel_time_range(-1.0, 3.0).validate().is_err());
        assert!(base.clone().with_demand_range(0, 5).validate().is_err());
        assert!(base.clone().with_horizon(f64::NAN).validate().is_err());
        assert!(base.clone().with_window_width_range(0.0, 10.0).validate().is_err());
        assert!(base.clone().with_window_width_range(10.0, 500.0).validate().is_err());
        assert!(generate(&base.with_fleet_size(0), 1).is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"num_customers":4}"#).expect("parses");
        assert_eq!(config, GeneratorConfig::default().with_num_customers(4));
    }
}
