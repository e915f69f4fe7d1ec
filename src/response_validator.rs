// response_validator.rs
use crate::questions::QuestionId;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Hint shown to the user when an answer is rejected.
pub type Rejection = &'static str;

pub const HINT_TOO_SHORT: &str = "Por favor, describe tu producto o servicio con más detalle. Necesito al menos unas palabras para entender mejor tu negocio.";
pub const HINT_NO_WORDS: &str = "No veo que hayas descrito un producto o servicio real. ¿Podrías contarme qué es lo que ofrecés específicamente?";
pub const HINT_INAPPROPRIATE: &str = "Eso no parece ser un producto o servicio legítimo que puedas ofrecer. ¿Podrías contarme sobre tu negocio real?";
pub const HINT_INVALID_PRODUCT: &str = "Mmm, eso no parece ser un producto o servicio que puedas vender. ¿Podrías contarme qué es lo que realmente ofrecés en tu negocio?";
pub const HINT_GIBBERISH_PRODUCT: &str = "No logro entender bien lo que escribiste. ¿Podrías describir nuevamente qué producto o servicio ofrecés? Por ejemplo: \"vendo ropa\", \"soy contador\", \"tengo una panadería\".";
pub const HINT_NOT_SPECIFIC: &str = "Necesito que me cuentes específicamente qué vendes o qué servicio ofrecés. ¿Podrías ser más claro?";
pub const HINT_ABSTRACT: &str = "Parece que mencionaste conceptos abstractos. Necesito que me cuentes sobre un producto concreto que vendas o un servicio específico que ofrezcas.";
pub const HINT_CUSTOMER_TOO_SHORT: &str = "Necesito más información sobre tu cliente ideal. ¿Podrías describir con más detalle quién es esa persona que realmente necesita lo que ofrecés?";
pub const HINT_GIBBERISH_CUSTOMER: &str = "No logro entender bien tu respuesta. ¿Podrías describir nuevamente quién es tu cliente ideal? Por ejemplo: \"mujeres de 25-40 años\", \"pequeños empresarios\", etc.";

const MIN_PRODUCT_LEN: usize = 3;
const MIN_CUSTOMER_LEN: usize = 5;
const REPEATED_LETTER_RUN: usize = 5;

const INVALID_PRODUCTS: &[&str] = &[
    "fuego", "agua", "aire", "tierra", "sol", "luna", "cielo", "mar", "océano",
    "amor", "felicidad", "tristeza", "miedo", "alegría", "dolor", "paz", "guerra",
    "vida", "muerte", "tiempo", "espacio", "universo", "dios", "diablo",
    "nada", "todo", "algo",
    "quemar", "arder", "volar", "caminar", "correr", "saltar", "gritar", "llorar",
    "reír", "dormir", "comer", "beber", "respirar", "pensar", "soñar",
    "fumar", "bailar", "cantar", "escuchar", "mirar", "tocar", "oler",
    "calor", "frío", "lluvia", "viento", "nieve", "hielo", "vapor",
    "luz", "sombra", "oscuridad", "silencio", "ruido", "música", "sonido",
    "violencia", "odio", "ira", "venganza", "maldad", "crueldad", "destrucción",
    "caos", "desastre", "ruina", "perdición", "condenación", "castigo",
    "sufrimiento", "tortura", "agresión", "ataque", "daño", "perjuicio",
    "asesinato", "asesinatos", "matar", "asesinar", "homicidio", "crimen",
    "robo", "robos", "robar", "hurto", "estafa", "fraude", "droga", "drogas",
    "arma", "armas", "pistola", "pistolas", "revólver", "rifle", "fusil",
    "bala", "balas", "munición", "municiones", "explosivo", "explosivos",
    "bomba", "bombas", "cuchillo", "cuchillos", "navaja", "navajas",
];

const ABSTRACT_CONCEPTS: &[&str] = &[
    "belleza", "libertad", "justicia", "verdad", "mentira", "esperanza", "desesperanza", "bondad",
];

const BUSINESS_INDICATORS: &[&str] = &[
    "vendo", "venta", "servicio", "producto", "negocio", "empresa", "tienda", "local",
    "ropa", "comida", "restaurante", "panadería", "peluquería", "taller", "consultorio",
    "contador", "abogado", "médico", "dentista", "veterinario", "profesor", "tutor",
    "limpieza", "construcción", "reparación", "instalación", "diseño", "fotografía",
    "catering", "delivery", "transporte", "mudanza", "jardinería", "carpintería",
    "plomería", "electricidad", "pintura", "decoración", "muebles", "electrodomésticos",
    "repuestos", "accesorios", "joyería", "zapatos", "bolsos", "perfumes", "cosméticos",
];

const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "de", "del", "en", "con", "por", "para", "que",
    "es", "son", "muy", "más", "pero", "como", "todo", "esta", "este",
];

lazy_static! {
    // No ASCII letter at all; accented or ñ-only text counts as symbols.
    static ref ONLY_SYMBOLS: Regex = Regex::new(r"^[^a-zA-Z_]+$").unwrap();
    static ref INAPPROPRIATE_PATTERNS: Vec<Regex> = [
        r"(?i)\b(asesinat|matar|mat[aáe]|homicidi|crimen|criminal)\w*\b",
        r"(?i)\b(rob[aoó]|hurt|estaf|fraud)\w*\b",
        r"(?i)\b(drog|narcotic|cocain|marihuan)\w*\b",
        r"(?i)\b(violenci|agresi[óo]n|tortur)\w*\b",
        r"(?i)\b(odio|venganz|maldad|crueldad)\b",
        r"(?i)\b(arm[oa]s?|pistol|revólver|rifle|fusil)\w*\b",
        r"(?i)\b(bal[oa]s?|munici[óo]n|explosiv)\w*\b",
        r"(?i)\b(bomb[oa]s?|cuchill|navaj)\w*\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref GIBBERISH_PATTERNS: Vec<Regex> = [
        // short words strung together
        r"(?i)^[a-z]{1,3}(\s[a-z]{1,3}){3,}$",
        // letters and digits mashed into one token
        r"(?i)^[a-z]*[0-9]+[a-z]*$",
        r"(?i)^[bcdfghjklmnpqrstvwxyz]{5,}$",
        r"(?i)^[aeiou]{4,}$",
        // keyboard rows
        r"(?i)\b(asdf|qwer|zxcv|hjkl|fghj|dfgh|sdfg|xcvb|vbnm)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// True when the same ASCII letter appears `run` or more times in a row.
fn has_repeated_letter(text: &str, run: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut count = 0;
    for c in text.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphabetic() && Some(c) == previous {
            count += 1;
        } else {
            count = 1;
        }
        if c.is_ascii_alphabetic() && count >= run {
            return true;
        }
        previous = Some(c);
    }
    false
}

pub fn is_gibberish(text: &str) -> bool {
    has_repeated_letter(text, REPEATED_LETTER_RUN)
        || GIBBERISH_PATTERNS.iter().any(|p| p.is_match(text))
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

fn has_business_indicator(words: &[&str]) -> bool {
    words
        .iter()
        .any(|word| BUSINESS_INDICATORS.iter().any(|indicator| word.contains(indicator)))
}

pub fn validate_product_service(input: &str) -> Result<(), Rejection> {
    let trimmed = input.trim().to_lowercase();

    if trimmed.chars().count() < MIN_PRODUCT_LEN {
        return Err(HINT_TOO_SHORT);
    }

    if ONLY_SYMBOLS.is_match(&trimmed) {
        return Err(HINT_NO_WORDS);
    }

    // Patterns run before single words so that inflected forms are caught.
    if INAPPROPRIATE_PATTERNS.iter().any(|p| p.is_match(&trimmed)) {
        debug!("Rejected product answer on inappropriate pattern: {}", trimmed);
        return Err(HINT_INAPPROPRIATE);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.iter().any(|word| INVALID_PRODUCTS.contains(word)) {
        return Err(HINT_INVALID_PRODUCT);
    }

    if is_gibberish(&trimmed) {
        return Err(HINT_GIBBERISH_PRODUCT);
    }

    let meaningful: Vec<&str> = words
        .iter()
        .copied()
        .filter(|word| word.chars().count() > 2 && !is_stopword(word))
        .collect();
    let has_indicator = has_business_indicator(&words);

    if meaningful.is_empty() && !has_indicator {
        return Err(HINT_NOT_SPECIFIC);
    }

    if !meaningful.is_empty() && !has_indicator {
        let all_abstract = meaningful
            .iter()
            .all(|word| INVALID_PRODUCTS.contains(word) || ABSTRACT_CONCEPTS.contains(word));
        if all_abstract {
            return Err(HINT_ABSTRACT);
        }
    }

    Ok(())
}

pub fn validate_ideal_customer(input: &str) -> Result<(), Rejection> {
    let trimmed = input.trim().to_lowercase();

    if trimmed.chars().count() < MIN_CUSTOMER_LEN {
        return Err(HINT_CUSTOMER_TOO_SHORT);
    }

    if is_gibberish(&trimmed) {
        return Err(HINT_GIBBERISH_CUSTOMER);
    }

    Ok(())
}

/// Validates a free-text answer for the given question. Questions without a
/// validator always accept.
pub fn validate_response(question: QuestionId, input: &str) -> Result<(), Rejection> {
    match question {
        QuestionId::ProductService => validate_product_service(input),
        QuestionId::IdealCustomer => validate_ideal_customer(input),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_are_rejected() {
        for input in ["", "a", "ab", "  ab  "] {
            assert_eq!(validate_product_service(input), Err(HINT_TOO_SHORT), "{:?}", input);
        }
        for input in ["", "abcd", "  xyz "] {
            assert_eq!(validate_ideal_customer(input), Err(HINT_CUSTOMER_TOO_SHORT), "{:?}", input);
        }
    }

    #[test]
    fn digits_and_symbols_only() {
        assert_eq!(validate_product_service("12345"), Err(HINT_NO_WORDS));
        assert_eq!(validate_product_service("!!! ???"), Err(HINT_NO_WORDS));
    }

    #[test]
    fn accented_letters_alone_are_not_words() {
        for input in ["áéíóú", "ñññññ", "éééé éééé"] {
            assert_eq!(validate_product_service(input), Err(HINT_NO_WORDS), "{:?}", input);
        }
        assert_eq!(validate_product_service("diseño gráfico"), Ok(()));
    }

    #[test]
    fn cualquier_inside_a_business_is_fine() {
        assert_eq!(validate_product_service("vendo cualquier tipo de repuestos"), Ok(()));
    }

    #[test]
    fn inappropriate_patterns_win_over_word_list() {
        assert_eq!(validate_product_service("vendo drogas"), Err(HINT_INAPPROPRIATE));
        assert_eq!(validate_product_service("Robamos autos"), Err(HINT_INAPPROPRIATE));
        assert_eq!(validate_product_service("cuchillos afilados"), Err(HINT_INAPPROPRIATE));
    }

    #[test]
    fn denylisted_words_are_rejected() {
        assert_eq!(validate_product_service("amor"), Err(HINT_INVALID_PRODUCT));
        assert_eq!(validate_product_service("agua y fuego"), Err(HINT_INVALID_PRODUCT));
    }

    #[test]
    fn gibberish_is_rejected() {
        for input in ["asdf", "aaaaaa", "bcdfgh", "aeiou", "abc123", "ab cd ef gh"] {
            assert_eq!(validate_product_service(input), Err(HINT_GIBBERISH_PRODUCT), "{:?}", input);
        }
        assert_eq!(validate_ideal_customer("qwer qwer"), Err(HINT_GIBBERISH_CUSTOMER));
        assert_eq!(validate_ideal_customer("zzzzzzz"), Err(HINT_GIBBERISH_CUSTOMER));
    }

    #[test]
    fn stopwords_only_is_not_specific() {
        assert_eq!(validate_product_service("el de la"), Err(HINT_NOT_SPECIFIC));
    }

    #[test]
    fn abstract_concepts_are_rejected() {
        assert_eq!(validate_product_service("belleza"), Err(HINT_ABSTRACT));
        assert_eq!(validate_product_service("la libertad"), Err(HINT_ABSTRACT));
    }

    #[test]
    fn real_businesses_are_accepted() {
        for input in [
            "Vendo ropa deportiva para mujeres",
            "soy contador",
            "tengo una panadería",
            "clases de yoga online",
            "Servicio de jardinería a domicilio",
        ] {
            assert_eq!(validate_product_service(input), Ok(()), "{:?}", input);
        }
        assert_eq!(validate_ideal_customer("mujeres de 25-40 años"), Ok(()));
        assert_eq!(validate_ideal_customer("pequeños empresarios"), Ok(()));
    }

    #[test]
    fn every_rejection_has_a_hint() {
        for input in ["", "1", "drogas", "amor", "asdf", "el de", "belleza"] {
            if let Err(hint) = validate_product_service(input) {
                assert!(!hint.is_empty());
            } else {
                panic!("expected rejection for {:?}", input);
            }
        }
    }

    #[test]
    fn other_questions_always_accept() {
        assert_eq!(validate_response(QuestionId::MarketingObjective, ""), Ok(()));
        assert_eq!(validate_response(QuestionId::SocialNetworks, "x"), Ok(()));
        assert_eq!(validate_response(QuestionId::ProductService, "x"), Err(HINT_TOO_SHORT));
    }

    #[test]
    fn repeated_letter_run() {
        assert!(has_repeated_letter("holaaaaa", 5));
        assert!(!has_repeated_letter("holaaaa", 5));
        assert!(!has_repeated_letter("11111", 5));
    }
}
