// campaign.rs
use serde::{Deserialize, Serialize};

pub const OBJECTIVE_VISIBILITY: &str = "Aumentar visibilidad de mi marca";
pub const OBJECTIVE_LEADS: &str = "Generar más leads/consultas";
pub const OBJECTIVE_SALES: &str = "Aumentar ventas directas";

pub const CAMPAIGN_DURATION: &str = "7 días";
pub const CHANNEL_META: &str = "Meta Ads (Instagram/Facebook)";
pub const CHANNEL_GOOGLE: &str = "Google Ads";

/// Marketing objective picked during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Objective {
    Visibility,
    Leads,
    Sales,
}

impl Objective {
    pub const ALL: [Objective; 3] = [Objective::Visibility, Objective::Leads, Objective::Sales];

    pub fn label(self) -> &'static str {
        match self {
            Objective::Visibility => OBJECTIVE_VISIBILITY,
            Objective::Leads => OBJECTIVE_LEADS,
            Objective::Sales => OBJECTIVE_SALES,
        }
    }

    /// Exact match against the option labels; anything else is unknown.
    pub fn from_label(label: &str) -> Option<Objective> {
        Objective::ALL.into_iter().find(|o| o.label() == label.trim())
    }
}

/// Answers collected by the onboarding wizard. Field names on the wire match
/// the stored `tukiUserData` blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(rename = "productoServicio", default)]
    pub product_service: String,
    #[serde(rename = "clienteIdeal", default)]
    pub ideal_customer: String,
    #[serde(rename = "objetivoMarketing", default)]
    pub marketing_objective: String,
    #[serde(rename = "redesSociales", default)]
    pub social_networks: Vec<String>,
}

impl UserData {
    pub fn objective(&self) -> Option<Objective> {
        Objective::from_label(&self.marketing_objective)
    }

    pub fn uses_meta(&self) -> bool {
        self.social_networks
            .iter()
            .any(|red| red.contains("Instagram") || red.contains("Facebook"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceData {
    #[serde(rename = "edadMin", skip_serializing_if = "Option::is_none", default)]
    pub age_min: Option<u32>,
    #[serde(rename = "edadMax", skip_serializing_if = "Option::is_none", default)]
    pub age_max: Option<u32>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    #[serde(rename = "intereses", skip_serializing_if = "Option::is_none", default)]
    pub interests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "texto")]
    pub body: String,
    #[serde(rename = "publicoObjetivo")]
    pub target_audience: String,
    #[serde(rename = "presupuesto")]
    pub budget: String,
    #[serde(rename = "duracion")]
    pub duration: String,
    #[serde(rename = "canal")]
    pub channel: String,
    #[serde(rename = "imagenes", skip_serializing_if = "Option::is_none", default)]
    pub images: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_data_uses_stored_field_names() {
        let data = UserData {
            product_service: "vendo ropa".into(),
            ideal_customer: "mujeres de 25-40 años".into(),
            marketing_objective: OBJECTIVE_SALES.into(),
            social_networks: vec!["Instagram".into()],
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["productoServicio"], "vendo ropa");
        assert_eq!(value["redesSociales"], json!(["Instagram"]));
        assert_eq!(data.objective(), Some(Objective::Sales));
    }

    #[test]
    fn meta_channel_detection() {
        let mut data = UserData::default();
        assert!(!data.uses_meta());
        data.social_networks = vec!["Email Marketing".into(), "Facebook".into()];
        assert!(data.uses_meta());
    }

    #[test]
    fn unknown_objective_label() {
        assert_eq!(Objective::from_label("Otra cosa"), None);
        assert_eq!(Objective::from_label(" Generar más leads/consultas "), Some(Objective::Leads));
    }

    #[test]
    fn audience_skips_missing_fields() {
        let audience = AudienceData {
            location: Some("Rosario".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&audience).unwrap(), json!({ "ubicacion": "Rosario" }));
    }
}
