use reqwest::Url;

use crate::models::providers;

const WHATSAPP_BASE: &str = "https://wa.me";

/// Greeting pre-filled in the customer's WhatsApp chat.
pub fn greeting(provider: &providers::Model) -> String {
    let category = Some(provider.category.trim())
        .filter(|c| !c.is_empty())
        .unwrap_or("Anda");
    format!(
        "Halo {}, saya melihat profil Anda di PintarLokal. Saya tertarik dengan jasa {}. Bisa bantu saya?",
        provider.name, category
    )
}

/// `wa.me` deep link for a provider, or `None` when no usable number is on file.
pub fn whatsapp_link(provider: &providers::Model) -> Option<String> {
    let digits: String = provider
        .whatsapp_number
        .as_deref()?
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }

    Url::parse_with_params(
        &format!("{WHATSAPP_BASE}/{digits}"),
        &[("text", greeting(provider))],
    )
    .ok()
    .map(String::from)
}
