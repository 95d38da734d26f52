//! Order-message composition and WhatsApp deep links.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

use crate::catalog::{CartItem, Product};
use crate::money::format_money;

/// Country calling code prefixed onto bare 10-digit local numbers.
///
/// Historical policy: merchants onboarded so far enter Colombian mobile
/// numbers without the country code. Deployments targeting another
/// region override this through configuration; it is not validation,
/// just a prefixing rule.
pub const DEFAULT_COUNTRY_CALLING_CODE: &str = "57";

/// Escape set equivalent to JavaScript's `encodeURIComponent`: every
/// byte except ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Fields the customer fills in on their own device. Always emitted
/// blank, whatever the cart contains.
const DELIVERY_FIELDS: [&str; 5] = [
    "Nombre",
    "Dirección",
    "Barrio/Ciudad",
    "Referencia",
    "Forma de pago",
];

/// Build the order message for a cart and percent-encode it for use as
/// a URL query value.
///
/// One summary line per resolvable cart entry, in cart order; entries
/// whose product id no longer resolves are skipped and contribute
/// nothing to the total. Monetary figures go through [`format_money`]
/// with the store's currency.
#[must_use]
pub fn compose_order_message(
    store_name: &str,
    currency: &str,
    items: &[CartItem],
    products_by_id: &HashMap<&str, &Product>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Hola, quiero hacer un pedido en {store_name}."));
    lines.push(String::new());
    lines.push("Resumen del pedido:".to_string());

    let mut total = Decimal::ZERO;
    for item in items {
        let Some(product) = products_by_id.get(item.product_id.as_str()) else {
            continue;
        };

        let line_total = product.price * Decimal::from(item.quantity);
        total += line_total;

        lines.push(format!(
            "- {} x {} ({}) = {}",
            item.quantity,
            product.name,
            format_money(product.price, currency),
            format_money(line_total, currency),
        ));
    }

    lines.push(String::new());
    lines.push(format!("Total: {}", format_money(total, currency)));
    lines.push(String::new());
    lines.push("Datos de entrega:".to_string());
    for field in DELIVERY_FIELDS {
        lines.push(format!("- {field}:"));
    }

    utf8_percent_encode(&lines.join("\n"), MESSAGE_ENCODE_SET).to_string()
}

/// Normalize a merchant-entered phone number into dialable digits.
///
/// Strips every non-digit, then prefixes `country_calling_code` when
/// exactly 10 digits remain (a bare local mobile number). Any other
/// digit count passes through as-is: already-prefixed numbers keep
/// their prefix and malformed input is not validated here.
#[must_use]
pub fn normalize_phone(raw: &str, country_calling_code: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        return format!("{country_calling_code}{digits}");
    }
    digits
}

/// Assemble the `wa.me` deep link from a raw merchant phone number and
/// an already percent-encoded message.
///
/// The message must come pre-encoded (from [`compose_order_message`]);
/// this function concatenates and never re-encodes.
#[must_use]
pub fn build_whatsapp_link(raw_phone: &str, encoded_message: &str, country_calling_code: &str) -> String {
    let phone = normalize_phone(raw_phone, country_calling_code);
    format!("https://wa.me/{phone}?text={encoded_message}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "whatsapp_test.rs"]
mod tests;
