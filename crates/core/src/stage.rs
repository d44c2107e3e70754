//! Deal pipeline stages and deal lifecycle status.
//!
//! Stages are stored as lowercase text in the database and on the wire.
//! Any stage may move to any other stage; there is no transition table.
//! The pipeline order only matters for board rendering and reporting.

use serde::{Deserialize, Serialize};

/// A named position in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStage {
    Potencial,
    Contactado,
    Propuesta,
    Negociacion,
    Ganado,
    Perdido,
}

/// All stages in pipeline order. Board columns render in this order.
pub const PIPELINE_STAGES: [DealStage; 6] = [
    DealStage::Potencial,
    DealStage::Contactado,
    DealStage::Propuesta,
    DealStage::Negociacion,
    DealStage::Ganado,
    DealStage::Perdido,
];

impl DealStage {
    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Potencial => "potencial",
            DealStage::Contactado => "contactado",
            DealStage::Propuesta => "propuesta",
            DealStage::Negociacion => "negociacion",
            DealStage::Ganado => "ganado",
            DealStage::Perdido => "perdido",
        }
    }

    /// Parse a wire/database value. Case-sensitive; the API layer rejects
    /// anything that does not match exactly.
    pub fn parse(s: &str) -> Option<DealStage> {
        match s {
            "potencial" => Some(DealStage::Potencial),
            "contactado" => Some(DealStage::Contactado),
            "propuesta" => Some(DealStage::Propuesta),
            "negociacion" => Some(DealStage::Negociacion),
            "ganado" => Some(DealStage::Ganado),
            "perdido" => Some(DealStage::Perdido),
            _ => None,
        }
    }

    /// Zero-based position in the pipeline, for column ordering.
    pub fn position(&self) -> usize {
        PIPELINE_STAGES.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Terminal stages close the pipeline for a deal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStage::Ganado | DealStage::Perdido)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal lifecycle status, orthogonal to the pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Activo,
    Cerrado,
    Descartado,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Activo => "activo",
            DealStatus::Cerrado => "cerrado",
            DealStatus::Descartado => "descartado",
        }
    }

    pub fn parse(s: &str) -> Option<DealStatus> {
        match s {
            "activo" => Some(DealStatus::Activo),
            "cerrado" => Some(DealStatus::Cerrado),
            "descartado" => Some(DealStatus::Descartado),
            _ => None,
        }
    }
}

impl std::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trips_through_str() {
        for stage in PIPELINE_STAGES {
            assert_eq!(DealStage::parse(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn stage_rejects_unknown_and_wrong_case() {
        assert_eq!(DealStage::parse("Potencial"), None);
        assert_eq!(DealStage::parse("won"), None);
        assert_eq!(DealStage::parse(""), None);
    }

    #[test]
    fn pipeline_positions_are_ordered() {
        assert_eq!(DealStage::Potencial.position(), 0);
        assert_eq!(DealStage::Negociacion.position(), 3);
        assert_eq!(DealStage::Perdido.position(), 5);
    }

    #[test]
    fn only_ganado_and_perdido_are_terminal() {
        assert!(DealStage::Ganado.is_terminal());
        assert!(DealStage::Perdido.is_terminal());
        assert!(!DealStage::Propuesta.is_terminal());
    }

    #[test]
    fn stage_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&DealStage::Negociacion).unwrap();
        assert_eq!(json, "\"negociacion\"");
        let back: DealStage = serde_json::from_str("\"ganado\"").unwrap();
        assert_eq!(back, DealStage::Ganado);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [DealStatus::Activo, DealStatus::Cerrado, DealStatus::Descartado] {
            assert_eq!(DealStatus::parse(status.as_str()), Some(status));
        }
    }
}
