use serde::Serialize;

/// Version of [`STEPS`] that new records are stamped with.
pub const SCHEMA_VERSION: u32 = 1;

/// Step id that used to hold per-day trade data before it was folded into
/// the record itself. Stored checklists may still carry it.
pub const OBSOLETE_REGISTRO_STEP: &str = "registro";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub items: usize,
}

pub const STEPS: &[StepConfig] = &[
    StepConfig { id: "preparacion", name: "Preparación Mental", items: 3 },
    StepConfig { id: "mensual", name: "Análisis Mensual", items: 2 },
    StepConfig { id: "semanal", name: "Análisis Semanal", items: 3 },
    StepConfig { id: "diario", name: "Análisis Diario", items: 4 },
    StepConfig { id: "h4", name: "Análisis 4H", items: 2 },
    StepConfig { id: "h1", name: "Análisis 1H", items: 3 },
    StepConfig { id: "entrada", name: "Modelo Entrada", items: 1 },
    StepConfig { id: "registro", name: "Registro Trade", items: 0 },
];

pub const NO_ENTRY_REASONS: &[&str] = &["R:R no era mínimo 1:1.2", "Fuera de ventana 9:30-10:15 AM"];

pub fn find_step(id: &str) -> Option<&'static StepConfig> {
    STEPS.iter().find(|s| s.id == id)
}

/// Total number of yes/no items across the schema.
pub fn scorable_items() -> usize {
    STEPS.iter().map(|s| s.items).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_ids_are_unique() {
        for (i, a) in STEPS.iter().enumerate() {
            assert!(STEPS.iter().skip(i + 1).all(|b| b.id != a.id), "duplicate {}", a.id);
        }
    }

    #[test]
    fn registration_step_has_no_items() {
        let step = find_step("registro").unwrap();
        assert_eq!(step.items, 0);
        assert_eq!(scorable_items(), 18);
    }
}
