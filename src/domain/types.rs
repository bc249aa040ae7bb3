use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// ============================================================================
// Physical Unit Newtypes
// ============================================================================
//
// All newtypes hold SI values. IP inputs go through the unit converter
// before they reach these types.

/// Power in Watts (W)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Power(pub f64);

impl Power {
    pub fn watts(w: f64) -> Self {
        Self(w)
    }

    pub fn kilowatts(kw: f64) -> Self {
        Self(kw * 1000.0)
    }

    pub fn as_watts(&self) -> f64 {
        self.0
    }

    pub fn as_kilowatts(&self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1000.0 {
            write!(f, "{:.2} kW", self.as_kilowatts())
        } else {
            write!(f, "{:.1} W", self.0)
        }
    }
}

impl Add for Power {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Power {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Temperature in Celsius (°C)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Temperature(pub f64);

impl Temperature {
    pub fn celsius(c: f64) -> Self {
        Self(c)
    }

    pub fn as_celsius(&self) -> f64 {
        self.0
    }

    pub fn as_fahrenheit(&self) -> f64 {
        self.0 * 9.0 / 5.0 + 32.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

/// Volumetric flow rate in cubic metres per second (m³/s)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct VolumeFlow(pub f64);

impl VolumeFlow {
    pub fn cubic_metres_per_second(v: f64) -> Self {
        Self(v)
    }

    pub fn as_cubic_metres_per_second(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for VolumeFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} m³/s", self.0)
    }
}

/// Volume in cubic metres (m³)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Volume(pub f64);

impl Volume {
    pub fn cubic_metres(v: f64) -> Self {
        Self(v)
    }

    pub fn as_cubic_metres(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m³", self.0)
    }
}

/// Pressure difference in Pascals (Pa)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Pressure(pub f64);

impl Pressure {
    pub fn pascals(pa: f64) -> Self {
        Self(pa)
    }

    pub fn as_pascals(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} Pa", self.0)
    }
}

/// Thermal resistance in m²·K/W
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct ThermalResistance(pub f64);

impl ThermalResistance {
    pub fn si(r: f64) -> Self {
        Self(r)
    }

    pub fn as_si(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ThermalResistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m²·K/W", self.0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
