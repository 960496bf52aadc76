use anyhow::{anyhow, Context, Result};

/// Render a weight value as the text the external program reads from its
/// environment. Fixed precision with trailing zeros trimmed keeps
/// one-decimal grid values exact: `0.1` stays `"0.1"`, never
/// `"0.10000000000000002"`.
pub fn format_weight(value: f64) -> String {
    let mut s = format!("{value:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

pub fn parse_weight(input: &str) -> Result<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Err(anyhow!("empty weight value"));
    }
    let value: f64 = s
        .parse()
        .with_context(|| format!("invalid weight value: {s}"))?;
    if !value.is_finite() {
        return Err(anyhow!("weight value must be finite: {s}"));
    }
    Ok(value)
}

pub fn parse_weight_csv(input: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        values.push(parse_weight(token)?);
    }
    if values.is_empty() {
        return Err(anyhow!("no weight values parsed from '{input}'"));
    }
    Ok(values)
}

/// `count` evenly spaced candidate values from `min` to `max` inclusive.
pub fn spaced_values(min: f64, max: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(anyhow!("value count must be >= 1"));
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(anyhow!("range bounds must be finite"));
    }
    if max < min {
        return Err(anyhow!("range max {max} is below min {min}"));
    }
    if count == 1 {
        return Ok(vec![min]);
    }
    let step = (max - min) / (count - 1) as f64;
    Ok((0..count).map(|i| min + step * i as f64).collect())
}

/// Arithmetic progression from `min` by `step` while still within `max`,
/// tolerant of float error at the upper boundary.
pub fn stepped_values(min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    if !min.is_finite() || !max.is_finite() || !step.is_finite() {
        return Err(anyhow!("range bounds and step must be finite"));
    }
    if step <= 0.0 {
        return Err(anyhow!("step must be > 0, got {step}"));
    }
    if max < min {
        return Err(anyhow!("range max {max} is below min {min}"));
    }
    let slack = step * 1e-9;
    let mut values = Vec::new();
    let mut i = 0u32;
    loop {
        let value = min + step * f64::from(i);
        if value > max + slack {
            break;
        }
        values.push(value);
        i += 1;
    }
    Ok(values)
}
