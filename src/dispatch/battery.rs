/// An ideal energy store shared by every dispatch policy.
///
/// `Battery` tracks stored energy only: no power limits, no efficiency
/// losses, no pricing. Charge always stays within `[0, capacity_kwh]`.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Capacity in kilowatt-hours.
    capacity_kwh: f64,

    /// Stored energy in kilowatt-hours.
    charge_kwh: f64,
}

/// Treats negative and non-finite requests as zero.
fn sanitize(amount_kwh: f64) -> f64 {
    if amount_kwh.is_finite() && amount_kwh > 0.0 {
        amount_kwh
    } else {
        0.0
    }
}

impl Battery {
    /// Creates an empty battery.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero, negative, or not finite.
    pub fn new(capacity_kwh: f64) -> Self {
        assert!(capacity_kwh.is_finite() && capacity_kwh > 0.0);

        Self {
            capacity_kwh,
            charge_kwh: 0.0,
        }
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    pub fn charge_kwh(&self) -> f64 {
        self.charge_kwh
    }

    /// Free room left before the battery is full.
    pub fn headroom_kwh(&self) -> f64 {
        self.capacity_kwh - self.charge_kwh
    }

    /// Stores up to the free room and returns the spill that did not fit.
    pub fn charge(&mut self, amount_kwh: f64) -> f64 {
        let amount = sanitize(amount_kwh);
        let stored = amount.min(self.headroom_kwh());
        self.charge_kwh = (self.charge_kwh + stored).min(self.capacity_kwh);
        amount - stored
    }

    /// Removes up to the current charge and returns the energy delivered.
    pub fn discharge(&mut self, amount_kwh: f64) -> f64 {
        let delivered = sanitize(amount_kwh).min(self.charge_kwh);
        self.charge_kwh = (self.charge_kwh - delivered).max(0.0);
        delivered
    }

    /// Empties the battery and returns what it held.
    pub fn drain(&mut self) -> f64 {
        std::mem::take(&mut self.charge_kwh)
    }

    /// Tops the battery up to capacity and returns the energy added.
    pub fn fill(&mut self) -> f64 {
        let added = self.headroom_kwh();
        self.charge_kwh = self.capacity_kwh;
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battery_is_empty() {
        let battery = Battery::new(100.0);
        assert_eq!(battery.capacity_kwh(), 100.0);
        assert_eq!(battery.charge_kwh(), 0.0);
        assert_eq!(battery.headroom_kwh(), 100.0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_capacity() {
        Battery::new(0.0);
    }

    #[test]
    #[should_panic]
    fn test_nan_capacity() {
        Battery::new(f64::NAN);
    }

    #[test]
    fn test_charge_spills_excess() {
        let mut battery = Battery::new(100.0);
        assert_eq!(battery.charge(60.0), 0.0);
        assert_eq!(battery.charge(60.0), 20.0);
        assert_eq!(battery.charge_kwh(), 100.0);
        assert_eq!(battery.charge(5.0), 5.0);
    }

    #[test]
    fn test_discharge_floors_at_zero() {
        let mut battery = Battery::new(100.0);
        battery.charge(30.0);
        assert_eq!(battery.discharge(10.0), 10.0);
        assert_eq!(battery.discharge(50.0), 20.0);
        assert_eq!(battery.charge_kwh(), 0.0);
        assert_eq!(battery.discharge(1.0), 0.0);
    }

    #[test]
    fn test_fill_and_drain() {
        let mut battery = Battery::new(50.0);
        battery.charge(20.0);
        assert_eq!(battery.fill(), 30.0);
        assert_eq!(battery.charge_kwh(), 50.0);
        assert_eq!(battery.fill(), 0.0);
        assert_eq!(battery.drain(), 50.0);
        assert_eq!(battery.charge_kwh(), 0.0);
        assert_eq!(battery.drain(), 0.0);
    }

    #[test]
    fn test_bad_amounts_are_ignored() {
        let mut battery = Battery::new(10.0);
        assert_eq!(battery.charge(-5.0), 0.0);
        assert_eq!(battery.charge(f64::NAN), 0.0);
        assert_eq!(battery.charge(f64::INFINITY), 0.0);
        assert_eq!(battery.charge_kwh(), 0.0);
        battery.fill();
        assert_eq!(battery.discharge(-3.0), 0.0);
        assert_eq!(battery.charge_kwh(), 10.0);
    }
}
