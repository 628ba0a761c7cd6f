/// Axis configuration with tick generation and data→pixel mapping.
///
/// Category axes map category `i` to the data value `i`, so `min`/`max`
/// of `-0.5` and `n - 0.5` center each category in its band.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
    /// Category names, in band order; empty for numeric axes.
    pub categories: Vec<String>,
}

impl Axis {
    /// Auto-scale linear axis with "nice number" ticks.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        let mut axis = Self::fixed(nice_min, nice_max);
        axis.fill_linear_ticks(step);
        axis
    }

    /// Linear axis with exact limits and nice ticks inside them.
    pub fn ranged(min: f64, max: f64, target_ticks: usize) -> Self {
        let (_, _, step) = nice_range(min, max, target_ticks);
        let mut axis = Self::fixed(min, max);
        axis.fill_linear_ticks(step);
        axis
    }

    fn fill_linear_ticks(&mut self, step: f64) {
        let mut v = (self.min / step).ceil() * step;
        while v <= self.max + step * 0.01 {
            self.tick_positions.push(v);
            self.tick_labels.push(format_tick(v, step));
            v += step;
        }
    }

    /// Auto-scale logarithmic axis. Non-positive bounds are clamped.
    pub fn auto_log(data_min: f64, data_max: f64) -> Self {
        let lo = if data_min > 0.0 { data_min } else { data_max.max(1.0) / 10.0 };
        let hi = data_max.max(lo);
        let mut log_min = lo.log10().floor() as i32;
        let mut log_max = hi.log10().ceil() as i32;
        if log_min == log_max {
            log_min -= 1;
            log_max += 1;
        }

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();

        for exp in log_min..=log_max {
            let v = 10.0_f64.powi(exp);
            ticks.push(v);
            labels.push(format_decade(exp));
            if exp < log_max {
                for m in 2..=9 {
                    minor.push(m as f64 * v);
                }
            }
        }

        Self {
            min: 10.0_f64.powi(log_min),
            max: 10.0_f64.powi(log_max),
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
            categories: Vec::new(),
        }
    }

    /// One band per category, ticks at band centers.
    pub fn category(categories: Vec<String>) -> Self {
        let n = categories.len().max(1) as f64;
        Self {
            min: -0.5,
            max: n - 0.5,
            log: false,
            label: String::new(),
            tick_positions: (0..categories.len()).map(|i| i as f64).collect(),
            tick_labels: categories.clone(),
            minor_ticks: Vec::new(),
            categories,
        }
    }

    /// Fixed axis with explicit limits (no tick auto-generation).
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_category(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Band position of a category label.
    pub fn category_index(&self, name: &str) -> Option<f64> {
        self.categories.iter().position(|c| c == name).map(|i| i as f64)
    }

    /// Whether `value` can be drawn on this axis.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && (!self.log || value > 0.0)
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        if self.log {
            let log_val = value.max(1e-20).ln();
            let log_min = self.min.max(1e-20).ln();
            let log_max = self.max.max(1e-20).ln();
            let frac = (log_val - log_min) / (log_max - log_min);
            px_min + frac * (px_max - px_min)
        } else {
            let frac = (value - self.min) / (self.max - self.min);
            px_min + frac * (px_max - px_min)
        }
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    if decimals == 0 {
        // Avoid "-0"
        let v = if value.abs() < step * 0.01 { 0.0 } else { value };
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

/// Decades from 0.001 to 1000 print as plain numbers, others as powers.
fn format_decade(exp: i32) -> String {
    match exp {
        -3..=-1 => format!("{:.prec$}", 10.0_f64.powi(exp), prec = (-exp) as usize),
        0..=3 => format!("{}", 10_i64.pow(exp as u32)),
        _ => format!("10{}", superscript(exp)),
    }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}
