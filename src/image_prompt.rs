// image_prompt.rs

pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=600&h=400&fit=crop";

const KEYWORD_STOPWORDS: &[&str] = &[
    "para", "con", "una", "del", "las", "los", "por", "que", "como", "alta", "calidad", "profesional",
];
const MAX_KEYWORDS: usize = 3;

/// Category keywords and the stock photo used when image search is
/// unavailable. First match wins.
const FALLBACK_IMAGES: &[(&[&str], &str)] = &[
    (
        &["comida", "restaurante", "alimento"],
        "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?w=600&h=400&fit=crop",
    ),
    (
        &["ropa", "moda", "vestimenta", "tenis"],
        "https://images.unsplash.com/photo-1441984904996-e0b6ba687e04?w=600&h=400&fit=crop",
    ),
    (
        &["tecnología", "software", "app"],
        "https://images.unsplash.com/photo-1519389950473-47ba0277781c?w=600&h=400&fit=crop",
    ),
    (
        &["salud", "medicina", "bienestar"],
        "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=600&h=400&fit=crop",
    ),
    (
        &["educación", "curso", "enseñanza"],
        "https://images.unsplash.com/photo-1513475382585-d06e58bcb0e0?w=600&h=400&fit=crop",
    ),
    (
        &["servicio", "consultoría", "asesor"],
        "https://images.unsplash.com/photo-1556761175-5973dc0f32e7?w=600&h=400&fit=crop",
    ),
    (
        &["deportes", "deporte", "raquetas"],
        "https://images.unsplash.com/photo-1554068865-24cecd4e34b8?w=600&h=400&fit=crop",
    ),
];

const PROMPT_STYLES: &[(&[&str], &str)] = &[
    (
        &["comida", "restaurante", "alimento"],
        "presentación gastronómica elegante, iluminación cálida, fondo limpio, alta calidad",
    ),
    (
        &["ropa", "moda", "vestimenta"],
        "modelo profesional, estudio fotográfico, iluminación perfecta, estilo moderno",
    ),
    (
        &["tecnología", "software", "app"],
        "ambiente tecnológico moderno, dispositivos elegantes, iluminación profesional",
    ),
    (
        &["salud", "medicina", "bienestar"],
        "ambiente médico profesional, colores suaves, limpio y confiable",
    ),
    (
        &["educación", "curso", "enseñanza"],
        "ambiente educativo moderno, libros, tecnología, inspirador",
    ),
];
const GENERIC_STYLE: &str =
    "contexto de uso realista, iluminación profesional, alta calidad, estilo comercial moderno";

fn lookup<'a>(table: &'a [(&[&str], &'a str)], text: &str) -> Option<&'a str> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, value)| *value)
}

/// Advertising-photo prompt tuned to the product category.
pub fn build_image_prompt(product: &str) -> String {
    let style = lookup(PROMPT_STYLES, product).unwrap_or(GENERIC_STYLE);
    format!("Fotografía publicitaria profesional de {}, {}", product, style)
}

/// Prompt suggested by the campaign image gallery.
pub fn auto_image_prompt(product: &str) -> String {
    format!(
        "Imagen promocional para {}, estilo moderno y profesional, colores atractivos, alta calidad, para redes sociales",
        product
    )
}

pub fn extract_keywords(prompt: &str) -> Vec<String> {
    prompt
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > 3 && !KEYWORD_STOPWORDS.contains(word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

pub fn fallback_image(prompt: &str) -> &'static str {
    lookup(FALLBACK_IMAGES, prompt).unwrap_or(DEFAULT_IMAGE)
}

/// Crude relevance check: the image URL mentions the first word of the
/// product description.
pub fn is_image_relevant(url: &str, product: &str) -> bool {
    let keyword = product.split(' ').next().unwrap_or_default().to_lowercase();
    url.to_lowercase().contains(&keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_follow_category() {
        assert_eq!(
            build_image_prompt("Comida casera"),
            "Fotografía publicitaria profesional de Comida casera, presentación gastronómica elegante, iluminación cálida, fondo limpio, alta calidad"
        );
        assert!(build_image_prompt("clases de yoga").ends_with(GENERIC_STYLE));
        assert!(auto_image_prompt("velas").starts_with("Imagen promocional para velas"));
    }

    #[test]
    fn keywords_skip_short_and_common_words() {
        let prompt = build_image_prompt("ropa deportiva");
        assert_eq!(extract_keywords(&prompt), vec!["fotografía", "publicitaria", "ropa"]);
        assert_eq!(extract_keywords("con una app para"), Vec::<String>::new());
    }

    #[test]
    fn fallback_table() {
        assert_eq!(fallback_image("Fotografía de comida"), FALLBACK_IMAGES[0].1);
        assert_eq!(fallback_image("raquetas de pádel"), FALLBACK_IMAGES[6].1);
        // tenis is footwear before it is a sport
        assert_eq!(fallback_image("zapatillas de TENIS"), FALLBACK_IMAGES[1].1);
        assert_eq!(fallback_image("raquetas de tenis"), FALLBACK_IMAGES[1].1);
        assert_eq!(fallback_image("velas aromáticas"), DEFAULT_IMAGE);
    }

    #[test]
    fn relevance_uses_first_word() {
        assert!(is_image_relevant("https://cdn.example.com/Zapatos-rojos.jpg", "zapatos rojos"));
        assert!(!is_image_relevant(DEFAULT_IMAGE, "zapatos rojos"));
    }
}
