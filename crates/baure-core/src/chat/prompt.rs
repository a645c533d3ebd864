//! Prompt composer: builds the instruction string for one chat turn.
//!
//! Sections are assembled in a fixed order and joined with blank lines:
//! persona, recipe block (only when a recipe was sent), context excerpt,
//! the verbatim question, and the output-format instructions. The output is
//! a pure function of its inputs.

use baure_types::chat::RecipeContext;
use baure_types::config::ChatConfig;

/// Rendered in place of any recipe field that is absent or blank.
pub const NOT_SPECIFIED: &str = "No especificado";

/// Which template a turn uses. Chosen solely by the query classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Local,
    WebSearch,
}

impl Template {
    pub fn from_classification(needs_web_search: bool) -> Self {
        if needs_web_search {
            Template::WebSearch
        } else {
            Template::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Local => "local",
            Template::WebSearch => "web_search",
        }
    }
}

/// Builds prompts with per-template context and answer-length limits.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    local_context_chars: usize,
    web_context_chars: usize,
    local_soft_cap: usize,
    web_soft_cap: usize,
}

impl PromptComposer {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            local_context_chars: config.local_context_chars,
            web_context_chars: config.web_context_chars,
            local_soft_cap: config.local_soft_cap,
            web_soft_cap: config.web_soft_cap,
        }
    }

    /// Assemble the full prompt for the given template.
    pub fn compose(
        &self,
        template: Template,
        question: &str,
        cultural_context: &str,
        recipe: Option<&RecipeContext>,
    ) -> String {
        let mut sections = Vec::with_capacity(6);

        sections.push(persona(template).to_string());

        if let Some(recipe) = recipe {
            sections.push(render_recipe_block(recipe));
        }

        let (label, cap) = match template {
            Template::Local => ("CONTEXTO", self.local_context_chars),
            Template::WebSearch => ("CONTEXTO BAURE", self.web_context_chars),
        };
        sections.push(format!("{label}:\n{}", excerpt(cultural_context, cap)));

        sections.push(format!("PREGUNTA: {question}"));

        match template {
            Template::Local => {
                sections.push(LOCAL_FORMAT.to_string());
                sections.push(rules(self.local_soft_cap, LOCAL_RULES));
            }
            Template::WebSearch => {
                sections.push(WEB_FORMAT.to_string());
                sections.push(rules(self.web_soft_cap, WEB_RULES));
            }
        }

        sections.push("RESPUESTA:".to_string());
        sections.join("\n\n")
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Serialize a recipe under fixed labeled headers.
///
/// Every header is always present. Ingredients are a 1-indexed list and
/// utensils a `- ` list, one entry per line; blank list entries are skipped.
pub fn render_recipe_block(recipe: &RecipeContext) -> String {
    let mut out = String::from("RECETA ESPECÍFICA EN CONTEXTO:\n");
    out.push_str(&format!("Nombre: {}\n", field(&recipe.name)));
    out.push_str(&format!("Nombre Baure: {}\n", field(&recipe.baure_name)));
    out.push_str(&format!("Descripción: {}\n", field(&recipe.description)));

    let ingredients: Vec<&str> = non_blank(&recipe.ingredients);
    let ingredients = if ingredients.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        ingredients
            .iter()
            .enumerate()
            .map(|(i, ing)| format!("{}. {ing}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };
    out.push_str(&format!("\nINGREDIENTES:\n{ingredients}\n"));

    out.push_str(&format!("\nPREPARACIÓN:\n{}\n", field(&recipe.preparation)));

    let utensils = non_blank(&recipe.utensils);
    let utensils = if utensils.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        utensils
            .iter()
            .map(|u| format!("- {u}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    out.push_str(&format!("\nUTENSILIOS:\n{utensils}\n"));

    out.push_str(&format!("\nCONSUMO:\n{}\n", field(&recipe.consumption)));
    out.push_str(&format!("\nCONSERVACIÓN:\n{}\n", field(&recipe.conservation)));
    out.push_str(&format!("\nFUENTE:\n{}", field(&recipe.source_person)));
    out
}

fn field(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

fn non_blank(values: &Option<Vec<String>>) -> Vec<&str> {
    values
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .collect()
}

fn persona(template: Template) -> &'static str {
    match template {
        Template::Local => {
            "Eres un experto en cocina tradicional Baure de Bolivia. \
             Comparte tus conocimientos de forma clara, natural y útil."
        }
        Template::WebSearch => {
            "Eres un chef experto en cocina tradicional Baure de Bolivia con \
             conocimiento en técnicas modernas. Comparte tus conocimientos de \
             forma clara y útil."
        }
    }
}

fn rules(soft_cap: usize, lines: &[&str]) -> String {
    let mut out = format!("REGLAS IMPORTANTES:\n✓ Máximo {soft_cap} caracteres");
    for line in lines {
        out.push_str("\n✓ ");
        out.push_str(line);
    }
    out
}

const LOCAL_FORMAT: &str = "FORMATO DE RESPUESTA OBLIGATORIO:
Usa formato Markdown. Responde de forma natural pero profesional, como si estuvieras conversando con alguien interesado en aprender.

**Respuesta:**

[Respuesta clara y directa en 2-3 oraciones, usando lenguaje natural]

**Puntos clave:**

• [Punto específico 1 con detalle útil]

• [Punto específico 2 con detalle útil]

• [Punto específico 3 con detalle útil]

**Nota tradicional:**

[Dato cultural o consejo práctico relacionado con la tradición Baure, si es relevante]";

const LOCAL_RULES: &[&str] = &[
    "Tono conversacional y natural (no robótico)",
    "CADA punto en una línea separada con doble salto",
    "SOLO incluir secciones con información real",
    "Si falta información, indicarlo brevemente sin ser seco",
    "Lenguaje claro y accesible",
    "TODO en español",
];

const WEB_FORMAT: &str = "FORMATO DE RESPUESTA OBLIGATORIO:
Usa formato Markdown. Responde de forma natural y profesional.

**Respuesta:**

[Explicación clara en 2-3 oraciones con lenguaje natural]

**Opciones recomendadas:**

• **Opción 1:** [Nombre] - [Descripción útil] - *Cantidad: [medida]*

• **Opción 2:** [Nombre] - [Descripción útil] - *Cantidad: [medida]*

• **Opción 3:** [Nombre] - [Descripción útil] - *Cantidad: [medida]*

**Cómo hacerlo:**

1. [Paso claro y específico con lenguaje natural]

2. [Paso claro y específico con lenguaje natural]

3. [Paso claro y específico con lenguaje natural]

**Nota práctica:**

[Consejo útil combinando tradición Baure con técnicas modernas, si aplica]";

const WEB_RULES: &[&str] = &[
    "Tono natural y conversacional (no robótico ni excesivamente técnico)",
    "CADA punto/opción/paso en línea separada con doble salto",
    "SOLO incluir secciones con datos concretos",
    "Cantidades específicas cuando las tengas",
    "Combinar sabiduría Baure + técnicas modernas",
    "TODO en español",
];

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &[&str] = &[
        "INGREDIENTES:",
        "PREPARACIÓN:",
        "UTENSILIOS:",
        "CONSUMO:",
        "CONSERVACIÓN:",
        "FUENTE:",
    ];

    fn full_recipe() -> RecipeContext {
        RecipeContext {
            name: Some("Masaco de yuca".to_string()),
            baure_name: Some("Kiwori".to_string()),
            description: Some("Masa de yuca cocida y pisada".to_string()),
            ingredients: Some(vec!["yuca".to_string(), "queso".to_string()]),
            preparation: Some("Cocer la yuca.\nPisarla con el queso.".to_string()),
            utensils: Some(vec!["olla".to_string(), "tacú".to_string()]),
            consumption: Some("Con café por la mañana".to_string()),
            conservation: Some("Un día en lugar fresco".to_string()),
            source_person: Some("Doña Rosa Chávez".to_string()),
        }
    }

    /// Read the body under a multi-line header back out of a rendered block.
    fn section<'a>(block: &'a str, header: &str) -> &'a str {
        let start = block.find(&format!("{header}\n")).unwrap() + header.len() + 1;
        let rest = &block[start..];
        let end = HEADERS
            .iter()
            .filter_map(|h| rest.find(&format!("\n\n{h}\n")))
            .min()
            .unwrap_or(rest.len());
        &rest[..end]
    }

    fn inline<'a>(block: &'a str, label: &str) -> &'a str {
        block
            .lines()
            .find_map(|l| l.strip_prefix(&format!("{label}: ")))
            .unwrap()
    }

    #[test]
    fn test_recipe_block_round_trips_fields() {
        let recipe = full_recipe();
        let block = render_recipe_block(&recipe);

        assert_eq!(inline(&block, "Nombre"), "Masaco de yuca");
        assert_eq!(inline(&block, "Nombre Baure"), "Kiwori");
        assert_eq!(inline(&block, "Descripción"), "Masa de yuca cocida y pisada");
        assert_eq!(section(&block, "INGREDIENTES:"), "1. yuca\n2. queso");
        assert_eq!(
            section(&block, "PREPARACIÓN:"),
            "Cocer la yuca.\nPisarla con el queso."
        );
        assert_eq!(section(&block, "UTENSILIOS:"), "- olla\n- tacú");
        assert_eq!(section(&block, "CONSUMO:"), "Con café por la mañana");
        assert_eq!(section(&block, "CONSERVACIÓN:"), "Un día en lugar fresco");
        assert_eq!(section(&block, "FUENTE:"), "Doña Rosa Chávez");
    }

    #[test]
    fn test_recipe_block_marks_missing_fields() {
        let recipe = RecipeContext {
            name: Some("Chicha".to_string()),
            baure_name: Some("   ".to_string()),
            ingredients: Some(vec![]),
            utensils: Some(vec![" ".to_string()]),
            ..Default::default()
        };
        let block = render_recipe_block(&recipe);

        assert_eq!(inline(&block, "Nombre Baure"), NOT_SPECIFIED);
        assert_eq!(inline(&block, "Descripción"), NOT_SPECIFIED);
        for header in HEADERS {
            assert_eq!(section(&block, header), NOT_SPECIFIED, "header: {header}");
        }
        assert!(!block.contains("undefined"));
        assert!(!block.contains("None"));
    }

    #[test]
    fn test_recipe_block_keeps_commas_inside_utensils() {
        let recipe = RecipeContext {
            utensils: Some(vec!["olla de barro, grande".into(), "batán".into()]),
            ..Default::default()
        };
        let block = render_recipe_block(&recipe);
        let utensils: Vec<&str> = section(&block, "UTENSILIOS:")
            .lines()
            .map(|l| l.strip_prefix("- ").unwrap())
            .collect();
        assert_eq!(utensils, vec!["olla de barro, grande", "batán"]);
    }

    #[test]
    fn test_recipe_block_skips_blank_ingredients() {
        let recipe = RecipeContext {
            ingredients: Some(vec!["yuca".into(), "".into(), "sal".into()]),
            ..Default::default()
        };
        let block = render_recipe_block(&recipe);
        assert_eq!(section(&block, "INGREDIENTES:"), "1. yuca\n2. sal");
    }

    #[test]
    fn test_context_excerpt_is_bounded() {
        let composer = PromptComposer::default();
        let context = "ж".repeat(10_000);

        let local = composer.compose(Template::Local, "¿Qué es?", &context, None);
        let web = composer.compose(Template::WebSearch, "¿Qué es?", &context, None);

        assert_eq!(local.matches('ж').count(), 3000);
        assert_eq!(web.matches('ж').count(), 2000);
    }

    #[test]
    fn test_excerpt_on_char_boundary() {
        assert_eq!(excerpt("añadir", 2), "añ");
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt("abc", 0), "");
    }

    #[test]
    fn test_local_prompt_without_recipe_has_no_recipe_block() {
        let composer = PromptComposer::default();
        let prompt = composer.compose(Template::Local, "¿cuánto tiempo se cocina?", "ctx", None);

        assert!(!prompt.contains("RECETA ESPECÍFICA"));
        assert!(!prompt.contains("INGREDIENTES:"));
        assert!(prompt.starts_with("Eres un experto en cocina tradicional Baure"));
        assert!(prompt.contains("CONTEXTO:\nctx"));
        assert!(prompt.contains("PREGUNTA: ¿cuánto tiempo se cocina?"));
        assert!(prompt.contains("**Puntos clave:**"));
        assert!(prompt.contains("✓ Máximo 500 caracteres"));
        assert!(prompt.ends_with("RESPUESTA:"));
    }

    #[test]
    fn test_web_prompt_sections_in_order() {
        let composer = PromptComposer::default();
        let recipe = full_recipe();
        let prompt = composer.compose(
            Template::WebSearch,
            "¿Puedo hacer esta receta sin gluten?",
            "Los Baure del Beni",
            Some(&recipe),
        );

        let persona = prompt.find("Eres un chef experto").unwrap();
        let recipe_at = prompt.find("RECETA ESPECÍFICA EN CONTEXTO:").unwrap();
        let context_at = prompt.find("CONTEXTO BAURE:\nLos Baure del Beni").unwrap();
        let question_at = prompt.find("PREGUNTA: ¿Puedo hacer esta receta sin gluten?").unwrap();
        let format_at = prompt.find("FORMATO DE RESPUESTA OBLIGATORIO:").unwrap();
        assert!(persona < recipe_at);
        assert!(recipe_at < context_at);
        assert!(context_at < question_at);
        assert!(question_at < format_at);

        assert!(prompt.contains("**Opciones recomendadas:**"));
        assert!(prompt.contains("**Cómo hacerlo:**"));
        assert!(prompt.contains("✓ Máximo 600 caracteres"));
        assert!(prompt.contains("1. yuca"));
    }

    #[test]
    fn test_soft_caps_follow_config() {
        let config = ChatConfig {
            local_soft_cap: 350,
            web_soft_cap: 450,
            ..Default::default()
        };
        let composer = PromptComposer::new(&config);
        assert!(composer
            .compose(Template::Local, "q", "c", None)
            .contains("✓ Máximo 350 caracteres"));
        assert!(composer
            .compose(Template::WebSearch, "q", "c", None)
            .contains("✓ Máximo 450 caracteres"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = PromptComposer::default();
        let recipe = full_recipe();
        let a = composer.compose(Template::WebSearch, "¿vegana?", "ctx", Some(&recipe));
        let b = composer.compose(Template::WebSearch, "¿vegana?", "ctx", Some(&recipe));
        assert_eq!(a, b);
    }

    #[test]
    fn test_template_from_classification() {
        assert_eq!(Template::from_classification(true), Template::WebSearch);
        assert_eq!(Template::from_classification(false), Template::Local);
        assert_eq!(Template::WebSearch.as_str(), "web_search");
    }
}
