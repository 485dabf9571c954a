//! HTML builders mirroring the vendors' markup

/// Price markup of a catalog row or schedule tier
pub fn price(price: &str, min_order: u32) -> String {
    format!(
        r#"<div class="price-box"><span class="price-single price-active" data-price="{price}" data-count="{min_order}">{price}</span></div>"#
    )
}

pub fn stock(text: &str) -> String {
    format!(r#"<span class="item-qnt">{text}</span>"#)
}

/// One catalog listing row; pass empty strings to leave the price or stock cell bare
pub fn catalog_row(sku: &str, code: u64, price_html: &str, stock_html: &str) -> String {
    format!(
        r#"<tr class="table-item">
  <td class="table-item-check"><input type="checkbox"></td>
  <td class="table-item-name">
    <a class="table-item-img" href="/product/{code}"><img src="/img/{code}.png"></a>
    <div class="table-item-title"><a href="/product/{code}">{sku}</a></div>
  </td>
  <td class="table-item-brand">ST</td>
  <td class="table-item-price">{price_html}</td>
  <td class="table-item-stock">{stock_html}</td>
</tr>"#
    )
}

pub fn catalog_page(rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
<table class="catalog-table">
  <tr><th></th><th>Наименование</th><th>Бренд</th><th>Цена</th><th>Наличие</th></tr>
  {}
</table>
</body></html>"#,
        rows.concat()
    )
}

pub fn search_page(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    format!(r#"<html><body><ul class="search-list">{items}</ul></body></html>"#)
}

/// Delivery-schedule fragment; each tier is `(price, min order, stock, term)`
pub fn schedule(tiers: &[(&str, u32, u32, &str)]) -> String {
    let rows: String = tiers
        .iter()
        .map(|(p, min, qty, term)| {
            format!(
                r#"<tr><td>{}</td><td>{}</td><td class="dms-term">{term}</td></tr>"#,
                price(p, *min),
                stock(&format!("{qty} шт."))
            )
        })
        .collect();
    format!(
        r#"<table class="dms-table"><tr><th>Цена</th><th>Количество</th><th>Срок</th></tr>{rows}</table>"#
    )
}

/// JSON-RPC envelope carrying an HTML fragment
pub fn rpc_result(html: &str) -> String {
    serde_json::json!({ "jsonrpc": "2.0", "result": { "html": html }, "id": 1 }).to_string()
}

/// JSON-RPC envelope reporting a server-side error
pub fn rpc_error(message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "code": -32000, "message": message },
        "id": 1
    })
    .to_string()
}

/// Secondary vendor product page; each tier is `(delivery, price, stock, min order)`
pub fn secondary_page(tiers: &[(&str, &str, &str, &str)]) -> String {
    let rows: String = tiers
        .iter()
        .map(|(delivery, price, stock, min)| {
            format!(
                r#"<tr><td class="offer-delivery">{delivery}</td><td class="offer-price">{price}</td><td class="offer-stock">{stock}</td><td class="offer-min">{min}</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="offers-table"><thead><tr><th>Срок</th><th>Цена</th><th>Наличие</th><th>Мин.</th></tr></thead><tbody>{rows}</tbody></table></body></html>"#
    )
}
