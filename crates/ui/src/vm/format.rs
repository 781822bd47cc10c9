/// Formats cents as Brazilian reais, e.g. `8000` -> `R$ 80,00`.
#[must_use]
pub fn format_price_cents(cents: u32) -> String {
    let reais = cents / 100;
    let centavos = cents % 100;
    format!("R$ {},{centavos:02}", group_thousands(reais))
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[must_use]
pub fn format_experience(years: Option<u32>) -> Option<String> {
    match years {
        None | Some(0) => None,
        Some(1) => Some("1 ano de experiência".to_owned()),
        Some(n) => Some(format!("{n} anos de experiência")),
    }
}
