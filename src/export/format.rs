//! Reshapes Stripe catalog records into the GraphQL-shaped product nodes the
//! WooNuxt front-end consumes. Field names, ordering, and defaults follow the
//! document the storefront already ships with, including the non-padded euro
//! rendering and the `producCardSourceUrl` key.

use crate::stripe::provider::{StripePrice, StripeProduct};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// One `products.nodes` entry. Serialized field order matches the consuming
/// front-end's document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: &'static str,
    pub database_id: String,
    pub id: String,
    pub meta_data: Vec<Value>,
    pub slug: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub raw_description: Option<String>,
    pub short_description: Option<String>,
    #[serde(rename = "price_id")]
    pub price_id: Option<String>,
    pub product_categories: NodeList<CategoryNode>,
    pub terms: NodeList<TermNode>,
    pub regular_price: String,
    pub raw_regular_price: String,
    pub currency: String,
    pub date: i64,
    pub stock_status: String,
    pub stock_quantity: Option<String>,
    pub low_stock_amount: Option<String>,
    pub average_rating: Value,
    pub weight: Option<String>,
    pub length: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub review_count: Value,
    pub on_sale: Value,
    #[serde(rename = "virtual")]
    pub virtual_product: Value,
    pub image: ProductImage,
    pub gallery_images: NodeList<GalleryImageNode>,
    pub reviews: Reviews,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeList<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub database_id: u32,
    pub slug: &'static str,
    pub name: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermNode {
    pub taxonomy_name: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub source_url: Option<String>,
    pub alt_text: String,
    pub title: String,
    pub database_id: String,
    pub cart_source_url: Option<String>,
    #[serde(rename = "producCardSourceUrl")]
    pub product_card_source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageNode {
    pub source_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviews {
    pub average_rating: Value,
    pub edges: Vec<Value>,
}

/// Product name lowercased with every space replaced by a hyphen. No other
/// characters are altered.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `unit_amount / 100` rendered the way the front-end's document renders it:
/// shortest round-trip float text, except integral values keep one trailing
/// decimal (1000 -> "10.0", 150 -> "1.5", 1999 -> "19.99"). Not padded to two
/// decimals; that rendering is load-bearing for the consumer.
pub fn display_amount(unit_amount: i64) -> String {
    let v = unit_amount as f64 / 100.0;
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn meta_opt(metadata: &HashMap<String, String>, key: &str) -> Option<String> {
    metadata.get(key).cloned()
}

/// Metadata echo with a typed default: present values come back as the
/// strings Stripe stores, absent ones as the default the front-end expects
/// (0, false).
fn meta_or(metadata: &HashMap<String, String>, key: &str, default: Value) -> Value {
    match metadata.get(key) {
        Some(v) => Value::String(v.clone()),
        None => default,
    }
}

/// Placeholder taxonomy until real category data is in scope. The front-end
/// renders these verbatim.
fn placeholder_categories() -> NodeList<CategoryNode> {
    NodeList {
        nodes: vec![CategoryNode {
            database_id: 30,
            slug: "clothing",
            name: "Clothing",
            count: 12,
        }],
    }
}

fn placeholder_terms() -> NodeList<TermNode> {
    NodeList {
        nodes: vec![TermNode {
            taxonomy_name: "product_cat",
            slug: "clothing",
        }],
    }
}

/// Map one (product, first-price-or-none) pair into one output node.
///
/// A product without a price gets the documented defaults (`price_id` null,
/// "€0.00" / "0.00" / "EUR") rather than failing the whole export.
pub fn format_product(product: &StripeProduct, price: Option<&StripePrice>) -> FormattedProduct {
    let (price_id, regular_price, raw_regular_price, currency) = match price {
        Some(p) => {
            // Tiered/metered prices carry a null unit_amount; those get the
            // same zero strings as a missing price, keeping the real id and
            // currency.
            let (display, raw) = match p.unit_amount {
                Some(amount) => (
                    format!("€{}", display_amount(amount)),
                    format!("{:.2}", amount as f64 / 100.0),
                ),
                None => ("€0.00".to_string(), "0.00".to_string()),
            };
            (Some(p.id.clone()), display, raw, p.currency.to_uppercase())
        }
        None => (None, "€0.00".to_string(), "0.00".to_string(), "EUR".to_string()),
    };

    let first_image = product.images.first().cloned();
    let metadata = &product.metadata;

    FormattedProduct {
        name: product.name.clone(),
        product_type: "SIMPLE",
        database_id: product.id.clone(),
        id: product.id.clone(),
        meta_data: Vec::new(),
        slug: slugify(&product.name),
        sku: meta_opt(metadata, "sku"),
        description: product.description.clone(),
        raw_description: product.description.clone(),
        short_description: product.description.clone(),
        price_id,
        product_categories: placeholder_categories(),
        terms: placeholder_terms(),
        regular_price,
        raw_regular_price,
        currency,
        date: product.created,
        stock_status: metadata
            .get("stock_status")
            .cloned()
            .unwrap_or_else(|| "IN_STOCK".to_string()),
        stock_quantity: meta_opt(metadata, "stock_quantity"),
        low_stock_amount: meta_opt(metadata, "low_stock_amount"),
        average_rating: meta_or(metadata, "average_rating", json!(0)),
        weight: meta_opt(metadata, "weight"),
        length: meta_opt(metadata, "length"),
        width: meta_opt(metadata, "width"),
        height: meta_opt(metadata, "height"),
        review_count: meta_or(metadata, "review_count", json!(0)),
        on_sale: meta_or(metadata, "on_sale", json!(false)),
        virtual_product: meta_or(metadata, "virtual", json!(false)),
        image: ProductImage {
            source_url: first_image.clone(),
            alt_text: String::new(),
            title: product.name.clone(),
            database_id: product.id.clone(),
            cart_source_url: first_image.clone(),
            product_card_source_url: first_image,
        },
        gallery_images: NodeList {
            nodes: product
                .images
                .iter()
                .map(|url| GalleryImageNode {
                    source_url: url.clone(),
                })
                .collect(),
        },
        reviews: Reviews {
            average_rating: meta_or(metadata, "average_rating", json!(0)),
            edges: Vec::new(),
        },
    }
}

/// Map the whole fetched catalog, order-preserving.
pub fn format_products(catalog: &[(StripeProduct, Option<StripePrice>)]) -> Vec<FormattedProduct> {
    catalog
        .iter()
        .map(|(product, price)| format_product(product, price.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, images: &[&str], meta: &[(&str, &str)]) -> StripeProduct {
        StripeProduct {
            id: id.to_string(),
            name: name.to_string(),
            description: Some("desc".to_string()),
            created: 1700000000,
            images: images.iter().map(|s| s.to_string()).collect(),
            metadata: meta
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn price(id: &str, unit_amount: i64, currency: &str) -> StripePrice {
        StripePrice {
            id: id.to_string(),
            unit_amount: Some(unit_amount),
            currency: currency.to_string(),
        }
    }

    #[test]
    fn red_shirt_scenario() {
        let p = product("prod_1", "Red Shirt", &["http://x/1.jpg"], &[("sku", "RS1")]);
        let pr = price("price_1", 1999, "eur");
        let out = format_product(&p, Some(&pr));

        assert_eq!(out.slug, "red-shirt");
        assert_eq!(out.regular_price, "€19.99");
        assert_eq!(out.raw_regular_price, "19.99");
        assert_eq!(out.currency, "EUR");
        assert_eq!(out.sku.as_deref(), Some("RS1"));
        assert_eq!(out.price_id.as_deref(), Some("price_1"));
        assert_eq!(out.gallery_images.nodes.len(), 1);
        assert_eq!(out.gallery_images.nodes[0].source_url, "http://x/1.jpg");
    }

    #[test]
    fn empty_metadata_and_no_images() {
        let p = product("prod_2", "Bare Product", &[], &[]);
        let out = format_product(&p, Some(&price("price_2", 500, "eur")));

        assert_eq!(out.stock_status, "IN_STOCK");
        assert_eq!(out.average_rating, json!(0));
        assert_eq!(out.review_count, json!(0));
        assert_eq!(out.on_sale, json!(false));
        assert_eq!(out.virtual_product, json!(false));
        assert_eq!(out.image.source_url, None);
        assert!(out.gallery_images.nodes.is_empty());
        assert_eq!(out.sku, None);
        assert_eq!(out.stock_quantity, None);
    }

    #[test]
    fn null_unit_amount_uses_the_zero_defaults() {
        let p = product("prod_6", "Metered Plan", &[], &[]);
        let metered = StripePrice {
            id: "price_6".to_string(),
            unit_amount: None,
            currency: "eur".to_string(),
        };
        let out = format_product(&p, Some(&metered));

        assert_eq!(out.regular_price, "€0.00");
        assert_eq!(out.raw_regular_price, "0.00");
        assert_eq!(out.price_id.as_deref(), Some("price_6"));
        assert_eq!(out.currency, "EUR");
    }

    #[test]
    fn no_price_gets_documented_defaults() {
        let p = product("prod_3", "Unpriced", &[], &[]);
        let out = format_product(&p, None);

        assert_eq!(out.price_id, None);
        assert_eq!(out.regular_price, "€0.00");
        assert_eq!(out.raw_regular_price, "0.00");
        assert_eq!(out.currency, "EUR");
    }

    #[test]
    fn price_rendering_is_not_padded() {
        // 150 minor units: display string drops the trailing zero, raw keeps it.
        assert_eq!(display_amount(150), "1.5");
        assert_eq!(display_amount(1999), "19.99");
        // Integral amounts keep one decimal, matching the shipped document.
        assert_eq!(display_amount(1000), "10.0");
        assert_eq!(display_amount(0), "0.0");

        let p = product("prod_4", "Half Shirt", &[], &[]);
        let out = format_product(&p, Some(&price("price_4", 150, "eur")));
        assert_eq!(out.regular_price, "€1.5");
        assert_eq!(out.raw_regular_price, "1.50");
    }

    #[test]
    fn slug_only_touches_case_and_spaces() {
        assert_eq!(slugify("Red Shirt"), "red-shirt");
        assert_eq!(slugify("Crew-Neck (Blue) 2.0"), "crew-neck-(blue)-2.0");
        assert_eq!(slugify("Tee  Double"), "tee--double");
    }

    #[test]
    fn metadata_values_are_echoed_as_strings() {
        let p = product(
            "prod_5",
            "Rated",
            &[],
            &[
                ("average_rating", "4.5"),
                ("review_count", "12"),
                ("on_sale", "true"),
                ("stock_status", "ON_BACKORDER"),
            ],
        );
        let out = format_product(&p, Some(&price("price_5", 100, "eur")));
        assert_eq!(out.average_rating, json!("4.5"));
        assert_eq!(out.review_count, json!("12"));
        assert_eq!(out.on_sale, json!("true"));
        assert_eq!(out.stock_status, "ON_BACKORDER");
        assert_eq!(out.reviews.average_rating, json!("4.5"));
    }

    #[test]
    fn serialized_field_names_match_consumer_schema() {
        let p = product("prod_1", "Red Shirt", &["http://x/1.jpg"], &[("sku", "RS1")]);
        let out = format_product(&p, Some(&price("price_1", 1999, "eur")));
        let v = serde_json::to_value(&out).unwrap();
        let obj = v.as_object().unwrap();

        assert_eq!(obj["type"], json!("SIMPLE"));
        assert!(obj.contains_key("databaseId"));
        assert!(obj.contains_key("metaData"));
        assert!(obj.contains_key("price_id"));
        assert!(obj.contains_key("regularPrice"));
        assert!(obj.contains_key("rawRegularPrice"));
        assert!(obj.contains_key("stockStatus"));
        assert!(obj.contains_key("onSale"));
        assert!(obj.contains_key("virtual"));
        assert_eq!(obj["image"]["producCardSourceUrl"], json!("http://x/1.jpg"));
        assert_eq!(obj["image"]["altText"], json!(""));
        assert_eq!(obj["galleryImages"]["nodes"][0]["sourceUrl"], json!("http://x/1.jpg"));
        assert_eq!(obj["productCategories"]["nodes"][0]["name"], json!("Clothing"));
        assert_eq!(obj["terms"]["nodes"][0]["taxonomyName"], json!("product_cat"));
        assert_eq!(obj["reviews"]["edges"], json!([]));
    }
}
