//! Last published value per device property.

use std::collections::HashMap;

use homenet_domain::device::DeviceKey;
use homenet_domain::property::Property;
use homenet_domain::value::StateValue;

/// Keyed store of the last value published for each `(device, property)`.
///
/// Owned by the gateway loop; the publisher writes it and the listener reads
/// it to skip commands that are already satisfied.
#[derive(Debug, Default)]
pub struct HomeStatus {
    values: HashMap<(DeviceKey, Property), StateValue>,
}

impl HomeStatus {
    /// Last published value, if any.
    #[must_use]
    pub fn get(&self, key: &DeviceKey, property: Property) -> Option<&StateValue> {
        self.values.get(&(key.clone(), property))
    }

    /// Record `value`, returning the previous one.
    pub fn set(
        &mut self,
        key: DeviceKey,
        property: Property,
        value: StateValue,
    ) -> Option<StateValue> {
        self.values.insert((key, property), value)
    }

    /// Number of recorded properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been published yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homenet_domain::device::DeviceKind;

    #[test]
    fn should_return_none_for_unknown_property() {
        let status = HomeStatus::default();
        assert!(status.is_empty());
        assert!(
            status
                .get(&DeviceKey::new(DeviceKind::Gas, "1"), Property::Power)
                .is_none()
        );
    }

    #[test]
    fn should_replace_previous_value() {
        let mut status = HomeStatus::default();
        let key = DeviceKey::new(DeviceKind::Fan, "1");
        assert_eq!(status.set(key.clone(), Property::Speed, StateValue::Text("Low")), None);
        assert_eq!(
            status.set(key.clone(), Property::Speed, StateValue::Text("High")),
            Some(StateValue::Text("Low"))
        );
        assert_eq!(
            status.get(&key, Property::Speed),
            Some(&StateValue::Text("High"))
        );
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn should_keep_properties_of_one_device_apart() {
        let mut status = HomeStatus::default();
        let key = DeviceKey::new(DeviceKind::Thermo, "1");
        status.set(key.clone(), Property::SetTemp, StateValue::Number(21));
        status.set(key.clone(), Property::CurTemp, StateValue::Number(19));
        assert_eq!(
            status.get(&key, Property::SetTemp),
            Some(&StateValue::Number(21))
        );
        assert_eq!(status.len(), 2);
    }
}
