use super::{Attributes, UNIT_SI, WavefrontSource};
use crate::domain::{ELECTRIC_FIELD_RECORD, Polarization, WavefrontError, WavefrontResult};
use crate::field::{ComplexField3, FieldShape};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct StoredComponent {
    field: ComplexField3,
    attributes: Attributes,
}

/// `electricField` record held entirely in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryWavefront {
    attributes: Attributes,
    components: BTreeMap<Polarization, StoredComponent>,
}

impl InMemoryWavefront {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            components: BTreeMap::new(),
        }
    }

    pub fn with_component(
        mut self,
        component: Polarization,
        field: ComplexField3,
        unit_si: f64,
    ) -> Self {
        let attributes = Attributes::new(component_location(component)).with(UNIT_SI, unit_si);
        self.insert_component(component, field, attributes);
        self
    }

    /// Insert a component with a caller-built attribute map.
    pub fn insert_component(
        &mut self,
        component: Polarization,
        field: ComplexField3,
        attributes: Attributes,
    ) {
        self.components
            .insert(component, StoredComponent { field, attributes });
    }

    fn stored(&self, component: Polarization) -> WavefrontResult<&StoredComponent> {
        self.components
            .get(&component)
            .ok_or_else(|| WavefrontError::ComponentNotFound {
                location: component_location(component),
            })
    }
}

fn component_location(component: Polarization) -> String {
    format!("{ELECTRIC_FIELD_RECORD}/{component}")
}

impl WavefrontSource for InMemoryWavefront {
    fn field_attributes(&self) -> WavefrontResult<Attributes> {
        Ok(self.attributes.clone())
    }

    fn has_component(&self, component: Polarization) -> bool {
        self.components.contains_key(&component)
    }

    fn component_attributes(&self, component: Polarization) -> WavefrontResult<Attributes> {
        Ok(self.stored(component)?.attributes.clone())
    }

    fn component_shape(&self, component: Polarization) -> WavefrontResult<FieldShape> {
        Ok(self.stored(component)?.field.shape())
    }

    fn read_component(&self, component: Polarization) -> WavefrontResult<ComplexField3> {
        Ok(self.stored(component)?.field.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryWavefront;
    use crate::domain::Polarization;
    use crate::field::{ComplexField3, FieldShape};
    use crate::source::{Attributes, WavefrontSource};

    #[test]
    fn reading_an_absent_component_fails() {
        let source = InMemoryWavefront::new(Attributes::new("electricField"));
        assert!(!source.has_component(Polarization::X));
        let error = source
            .read_component(Polarization::X)
            .expect_err("absent component should not be readable");
        assert!(error.to_string().contains("electricField/x"));
    }

    #[test]
    fn component_attributes_are_located_under_the_record() {
        let source = InMemoryWavefront::new(Attributes::new("electricField")).with_component(
            Polarization::X,
            ComplexField3::zeros(FieldShape::new(1, 1, 1)),
            1.0,
        );
        let attributes = source
            .component_attributes(Polarization::X)
            .expect("attributes");
        assert_eq!(attributes.location(), "electricField/x");
    }
}
