// campaign_generator.rs
use crate::campaign::{
    AudienceData, Campaign, Objective, UserData, CAMPAIGN_DURATION, CHANNEL_GOOGLE, CHANNEL_META,
};
use crate::error::TukiError;

use lazy_static::lazy_static;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

pub const DEFAULT_BUDGET: &str = "$20-30 por día";

const AGE_RANGES: [(u32, u32); 4] = [(18, 35), (25, 45), (30, 50), (35, 55)];
const LOCATIONS: [&str; 3] = [
    "Argentina",
    "Buenos Aires, Argentina",
    "Principales ciudades de Argentina",
];

lazy_static! {
    static ref PRODUCT_PATTERNS: Vec<Regex> = [
        r"tengo (?:una?|un) (.+)",
        r"vendo (.+)",
        r"ofrezco (.+)",
        r"mi negocio es (?:de |una? |un )?(.+)",
        r"soy (.+)",
        r"trabajo (?:en |con |de )?(.+)",
        r"me dedico a (.+)",
        r"hago (.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref TRAILING_LOCATION: Regex = Regex::new(r"\s+en\s+.+$").unwrap();
    static ref LEADING_VERB: Regex =
        Regex::new(r"(?i)^(tengo|soy|vendo|ofrezco|mi negocio es|trabajo|me dedico a|hago)\s*").unwrap();
    static ref INFORMAL_TU: Regex = Regex::new(r"\btu\b").unwrap();
    static ref ENDS_WITH_PUNCTUATION: Regex = Regex::new(r"[.!?]$").unwrap();
}

/// Pulls the product or service noun phrase out of a free-text answer, e.g.
/// "Vendo ropa deportiva en Rosario" -> "ropa deportiva".
pub fn extract_product_service(user_input: &str) -> String {
    let input = user_input.trim().to_lowercase();

    for pattern in PRODUCT_PATTERNS.iter() {
        if let Some(product) = pattern.captures(&input).and_then(|c| c.get(1)) {
            let product = product.as_str().trim();
            return TRAILING_LOCATION.replace(product, "").into_owned();
        }
    }

    LEADING_VERB.replace(&input, "").into_owned()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalizes, balances the opening `¿`/`¡`, closes the sentence and
/// accents the pronoun `tú`.
pub fn ensure_spanish_grammar(text: &str) -> String {
    let mut t = capitalize_first(text.trim());
    if t.is_empty() {
        return t;
    }

    if t.ends_with('?') {
        if !t.contains('¿') {
            t.insert(0, '¿');
        }
    } else if t.ends_with('!') {
        if !t.contains('¡') {
            t.insert(0, '¡');
        }
    } else if !ENDS_WITH_PUNCTUATION.is_match(&t) {
        t.push('.');
    }

    INFORMAL_TU.replace_all(&t, "tú").into_owned()
}

fn title_templates(product: &str) -> Vec<String> {
    let capitalized = capitalize_first(product);
    vec![
        format!("¿Necesitás {}? ¡Contactanos!", product),
        format!("¿Buscás {} de calidad? ¡Escribinos!", product),
        format!("{} - ¡Consultá ahora!", capitalized),
        format!("¿Querés el mejor {}? ¡Hablamos!", product),
        format!("{} de primera calidad", capitalized),
    ]
}

fn ad_text_templates(objective: Objective, product: &str) -> Vec<String> {
    match objective {
        Objective::Visibility => vec![
            format!("Descubrí nuestra línea de {} y sentí la diferencia. Calidad garantizada.", product),
            format!("Tu próximo {} está acá. Elegí calidad y estilo hoy mismo.", product),
            format!("Innovación y diseño en {}. Mirá lo que tenemos preparado para vos.", product),
            format!("Llevá tu experiencia al siguiente nivel con nuestros {}. Conocenos ahora.", product),
            format!("Somos referentes en {}. Visitanos y comprobalo vos mismo.", product),
        ],
        Objective::Leads => vec![
            format!("¿Buscás {} de calidad? Escribinos y recibí asesoramiento gratis.", product),
            format!("Consultá hoy por nuestros {} y obtené respuestas al instante.", product),
            format!("Contanos qué tipo de {} necesitás y te ayudamos a elegir la mejor opción.", product),
            format!("Obtené información detallada y presupuestos sin compromiso sobre {}.", product),
            format!("Estamos online para resolver tus dudas sobre {}. ¡Consultanos ahora!", product),
        ],
        Objective::Sales => vec![
            format!("Aprovechá esta promo en {}. Stock limitado, ¡comprá ahora!", product),
            format!("Financiación en cuotas y envío sin cargo en todos los {}.", product),
            format!("Comprá hoy tu {} con descuento exclusivo y recibilo en 24 h.", product),
            format!("Solo por tiempo limitado: 20% off en {}. No te lo pierdas.", product),
            format!("Llevate tu nuevo {} con garantía total y precio especial.", product),
        ],
    }
}

fn pick<R: Rng>(templates: Vec<String>, rng: &mut R) -> String {
    templates.choose(rng).cloned().unwrap_or_default()
}

pub fn generate_title<R: Rng>(product_service: &str, rng: &mut R) -> String {
    let product = extract_product_service(product_service);
    ensure_spanish_grammar(&pick(title_templates(&product), rng))
}

/// Body copy for the objective; unknown objectives use the visibility set.
pub fn generate_ad_text<R: Rng>(
    product_service: &str,
    objective: Option<Objective>,
    rng: &mut R,
) -> String {
    let product = extract_product_service(product_service);
    let objective = objective.unwrap_or(Objective::Visibility);
    ensure_spanish_grammar(&pick(ad_text_templates(objective, &product), rng))
}

pub fn generate_budget(objective: Option<Objective>) -> &'static str {
    match objective {
        Some(Objective::Visibility) => "$15-25 por día",
        Some(Objective::Leads) => "$20-35 por día",
        Some(Objective::Sales) => "$25-40 por día",
        None => DEFAULT_BUDGET,
    }
}

pub fn generate_audience_data<R: Rng>(ideal_customer: &str, rng: &mut R) -> AudienceData {
    let (age_min, age_max) = AGE_RANGES[rng.gen_range(0..AGE_RANGES.len())];
    let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];

    AudienceData {
        age_min: Some(age_min),
        age_max: Some(age_max),
        location: Some(location.to_string()),
        interests: Some(ideal_customer.to_lowercase()),
    }
}

pub fn format_audience(audience: &AudienceData) -> String {
    let mut parts = Vec::new();

    if let (Some(min), Some(max)) = (audience.age_min, audience.age_max) {
        if min > 0 && max > 0 {
            parts.push(format!("{}-{} años", min, max));
        }
    }
    if let Some(location) = audience.location.as_deref().filter(|l| !l.trim().is_empty()) {
        parts.push(location.to_string());
    }
    if let Some(interests) = audience.interests.as_deref().filter(|i| !i.trim().is_empty()) {
        parts.push(format!("interesados en: {}", interests));
    }

    parts.join(", ")
}

/// Checks a hand-entered audience: it needs a location or interests, and
/// age bounds must be ordered.
pub fn validate_audience(audience: &AudienceData) -> Result<(), TukiError> {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank(&audience.location) && blank(&audience.interests) {
        return Err(TukiError::Validation(
            "Indicá al menos una ubicación o intereses para tu público objetivo.".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (audience.age_min, audience.age_max) {
        if min > max {
            return Err(TukiError::Validation(
                "La edad mínima no puede superar a la edad máxima.".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn create_campaign<R: Rng>(
    user_data: &UserData,
    audience: Option<&AudienceData>,
    rng: &mut R,
) -> Campaign {
    let channel = if user_data.uses_meta() {
        CHANNEL_META
    } else {
        CHANNEL_GOOGLE
    };
    let objective = user_data.objective();

    let title = generate_title(&user_data.product_service, rng);
    let body = generate_ad_text(&user_data.product_service, objective, rng);

    let target_audience = match audience {
        Some(audience) => format_audience(audience),
        None => {
            debug!("No audience supplied, synthesizing one");
            format_audience(&generate_audience_data(&user_data.ideal_customer, rng))
        }
    };

    info!("Generated campaign '{}' for channel {}", title, channel);

    Campaign {
        title,
        body,
        target_audience,
        budget: generate_budget(objective).to_string(),
        duration: CAMPAIGN_DURATION.to_string(),
        channel: channel.to_string(),
        images: None,
    }
}
