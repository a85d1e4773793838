//! Catalog filter/sort contract.
//!
//! Query parameters arrive as an untyped bag of optional strings ([`CatalogParams`]). They
//! are normalized once into a [`CatalogQuery`], which can then be evaluated two ways with the
//! same semantics:
//!
//! - [`CatalogQuery::fetch`] turns it into SQL predicates and an `ORDER BY` over products
//!   joined with their brand.
//! - [`CatalogQuery::apply`] evaluates it over listings already in memory; the storefront
//!   client uses this when the backend cannot be reached.
//!
//! Rules:
//! - `category` matches exactly; `brand` matches the related brand's name exactly.
//! - `search` is a case-insensitive substring match on the product name. `%`, `_` and `\`
//!   in the term match literally.
//! - `minPrice`/`maxPrice` are inclusive and only apply when they parse as non-negative
//!   numbers; anything else is ignored, never rejected.
//! - Empty or whitespace-only values count as absent.
//! - All supplied predicates are ANDed together.
//! - Sort tokens `price-asc`, `price-desc`, `name-asc`, `name-desc`; anything else
//!   (including `newest` and no token at all) sorts by id descending. Ties break on id in the
//!   same direction as the sort, so the ascending and descending orders of a fixed set are
//!   exact reverses.

use crate::{
    core::product::ProductListing,
    entities::{Brand, Product, brand, product},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{
    QueryOrder,
    prelude::*,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use tracing::debug;

/// Raw catalog query parameters, exactly as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    /// Exact category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Case-insensitive substring of the product name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact brand name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Inclusive lower price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    /// Sort token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Result ordering for catalog listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Name A to Z
    NameAsc,
    /// Name Z to A
    NameDesc,
    /// Most recently created first
    #[default]
    Newest,
}

impl SortOrder {
    /// Maps a sort token to an order. Unknown tokens fall back to [`SortOrder::Newest`].
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token.map(str::trim) else {
            return Self::Newest;
        };
        token.parse().unwrap_or_else(|()| {
            debug!("Unknown sort parameter: {token}");
            Self::Newest
        })
    }

    /// The query-string token for this order.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Newest => "newest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        match token {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "" | "newest" => Ok(Self::Newest),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A normalized catalog query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Exact category filter
    pub category: Option<String>,
    /// Name substring, matched case-insensitively
    pub search: Option<String>,
    /// Exact brand name filter
    pub brand: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
    /// Result ordering
    pub sort: SortOrder,
}

impl From<&CatalogParams> for CatalogQuery {
    fn from(params: &CatalogParams) -> Self {
        Self {
            category: non_empty(params.category.as_deref()),
            search: non_empty(params.search.as_deref()),
            brand: non_empty(params.brand.as_deref()),
            min_price: parse_price(params.min_price.as_deref()),
            max_price: parse_price(params.max_price.as_deref()),
            sort: SortOrder::from_token(params.sort.as_deref()),
        }
    }
}

impl CatalogQuery {
    /// Runs the query against the database, returning products with their brands.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn fetch<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<ProductListing>> {
        let mut select = Product::find().find_also_related(Brand);

        if let Some(category) = &self.category {
            select = select.filter(product::Column::Category.eq(category.as_str()));
        }
        if let Some(term) = &self.search {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((
                    product::Entity,
                    product::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        if let Some(brand_name) = &self.brand {
            select = select.filter(brand::Column::Name.eq(brand_name.as_str()));
        }
        if let Some(min_price) = self.min_price {
            select = select.filter(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = self.max_price {
            select = select.filter(product::Column::Price.lte(max_price));
        }

        let select = match self.sort {
            SortOrder::PriceAsc => select
                .order_by_asc(product::Column::Price)
                .order_by_asc(product::Column::Id),
            SortOrder::PriceDesc => select
                .order_by_desc(product::Column::Price)
                .order_by_desc(product::Column::Id),
            SortOrder::NameAsc => select
                .order_by_asc(product::Column::Name)
                .order_by_asc(product::Column::Id),
            SortOrder::NameDesc => select
                .order_by_desc(product::Column::Name)
                .order_by_desc(product::Column::Id),
            SortOrder::Newest => select.order_by_desc(product::Column::Id),
        };

        let listings: Vec<ProductListing> = select
            .all(db)
            .await?
            .into_iter()
            .map(ProductListing::from)
            .collect();
        debug!(
            count = listings.len(),
            sort = %self.sort,
            "Found products matching criteria"
        );
        Ok(listings)
    }

    /// Whether a single listing satisfies every filter of this query.
    #[must_use]
    pub fn matches(&self, listing: &ProductListing) -> bool {
        let product = &listing.product;

        if self
            .category
            .as_ref()
            .is_some_and(|category| product.category != *category)
        {
            return false;
        }
        if self
            .search
            .as_ref()
            .is_some_and(|term| !product.name.to_lowercase().contains(&term.to_lowercase()))
        {
            return false;
        }
        if let Some(brand_name) = &self.brand {
            let same_brand = listing
                .brand
                .as_ref()
                .is_some_and(|brand| brand.name == *brand_name);
            if !same_brand {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Filters and sorts listings in memory with the same semantics as [`Self::fetch`].
    #[must_use]
    pub fn apply(&self, listings: &[ProductListing]) -> Vec<ProductListing> {
        let mut matched: Vec<ProductListing> = listings
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.compare(&a.product, &b.product));
        matched
    }

    fn compare(&self, a: &product::Model, b: &product::Model) -> Ordering {
        match self.sort {
            SortOrder::PriceAsc => a.price.cmp(&b.price).then(a.id.cmp(&b.id)),
            SortOrder::PriceDesc => b.price.cmp(&a.price).then(b.id.cmp(&a.id)),
            SortOrder::NameAsc => a.name.cmp(&b.name).then(a.id.cmp(&b.id)),
            SortOrder::NameDesc => b.name.cmp(&a.name).then(b.id.cmp(&a.id)),
            SortOrder::Newest => b.id.cmp(&a.id),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parses a price bound; malformed or negative input yields `None`.
fn parse_price(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|price| *price >= Decimal::ZERO)
}

/// Escapes LIKE wildcards so the term matches literally (escape character `\`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use std::collections::BTreeSet;

    fn params(pairs: &[(&str, &str)]) -> CatalogParams {
        let mut params = CatalogParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "category" => params.category = value,
                "search" => params.search = value,
                "brand" => params.brand = value,
                "minPrice" => params.min_price = value,
                "maxPrice" => params.max_price = value,
                "sort" => params.sort = value,
                other => panic!("unknown catalog parameter {other}"),
            }
        }
        params
    }

    fn ids(listings: &[ProductListing]) -> Vec<i64> {
        listings.iter().map(|listing| listing.product.id).collect()
    }

    fn id_set(listings: &[ProductListing]) -> BTreeSet<i64> {
        listings.iter().map(|listing| listing.product.id).collect()
    }

    #[test]
    fn test_sort_tokens() {
        assert_eq!(SortOrder::from_token(Some("price-asc")), SortOrder::PriceAsc);
        assert_eq!(SortOrder::from_token(Some("price-desc")), SortOrder::PriceDesc);
        assert_eq!(SortOrder::from_token(Some("name-asc")), SortOrder::NameAsc);
        assert_eq!(SortOrder::from_token(Some("name-desc")), SortOrder::NameDesc);
        assert_eq!(SortOrder::from_token(Some("newest")), SortOrder::Newest);
        assert_eq!(SortOrder::from_token(None), SortOrder::Newest);
    }

    #[test]
    fn test_unknown_sort_token_falls_back_to_newest() {
        assert_eq!(SortOrder::from_token(Some("cheapest")), SortOrder::Newest);
        assert_eq!(SortOrder::from_token(Some("PRICE-ASC")), SortOrder::Newest);
    }

    #[test]
    fn test_price_parsing_ignores_malformed_and_negative_values() {
        assert_eq!(parse_price(Some("120.50")), Some(Decimal::new(12050, 2)));
        assert_eq!(parse_price(Some(" 99 ")), Some(Decimal::new(99, 0)));
        assert_eq!(parse_price(Some("1e3")), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_price(Some("0")), Some(Decimal::ZERO));
        assert_eq!(parse_price(Some("abc")), None);
        assert_eq!(parse_price(Some("-5")), None);
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let query = CatalogQuery::from(&params(&[
            ("category", ""),
            ("search", "   "),
            ("brand", ""),
            ("minPrice", "abc"),
        ]));
        assert_eq!(query, CatalogQuery::default());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("aviator"), "aviator");
    }

    #[test]
    fn test_apply_in_memory() {
        let listings = sample_listings();

        let query = CatalogQuery::from(&params(&[("brand", "Gucci"), ("sort", "price-asc")]));
        let result = query.apply(&listings);
        assert!(result.iter().all(|l| l.brand.as_ref().unwrap().name == "Gucci"));
        assert!(result.windows(2).all(|w| w[0].product.price <= w[1].product.price));

        let query = CatalogQuery::from(&params(&[("search", "AVIATOR")]));
        let result = query.apply(&listings);
        assert!(!result.is_empty());
        assert!(result.iter().all(|l| l.product.name.to_lowercase().contains("aviator")));

        // Default order is newest first
        let result = CatalogQuery::default().apply(&listings);
        assert!(result.windows(2).all(|w| w[0].product.id > w[1].product.id));
        assert_eq!(result.len(), listings.len());
    }

    #[tokio::test]
    async fn test_no_filters_returns_everything_newest_first() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let result = CatalogQuery::default().fetch(&db).await?;
        assert_eq!(result.len(), 6);
        assert!(result.windows(2).all(|w| w[0].product.id > w[1].product.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_each_filter() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let by_category = CatalogQuery::from(&params(&[("category", "sunglasses")]))
            .fetch(&db)
            .await?;
        assert_eq!(by_category.len(), 3);
        assert!(by_category.iter().all(|l| l.product.category == "sunglasses"));

        let by_brand = CatalogQuery::from(&params(&[("brand", "Ray-Ban")]))
            .fetch(&db)
            .await?;
        assert_eq!(by_brand.len(), 2);
        assert!(
            by_brand
                .iter()
                .all(|l| l.brand.as_ref().unwrap().name == "Ray-Ban")
        );

        let by_search = CatalogQuery::from(&params(&[("search", "AVIATOR")]))
            .fetch(&db)
            .await?;
        assert_eq!(by_search.len(), 2);

        let by_range = CatalogQuery::from(&params(&[("minPrice", "150"), ("maxPrice", "300")]))
            .fetch(&db)
            .await?;
        assert!(!by_range.is_empty());
        assert!(by_range.iter().all(|l| {
            l.product.price >= Decimal::new(150, 0) && l.product.price <= Decimal::new(300, 0)
        }));

        Ok(())
    }

    #[tokio::test]
    async fn test_price_bounds_are_inclusive() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        // Exactly the price of "Ray-Ban Wayfarer" (150.00)
        let result = CatalogQuery::from(&params(&[("minPrice", "150"), ("maxPrice", "150")]))
            .fetch(&db)
            .await?;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].product.name, "Ray-Ban Wayfarer");

        Ok(())
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let result = CatalogQuery::from(&params(&[("search", "%")])).fetch(&db).await?;
        assert_eq!(ids(&result), Vec::<i64>::new());

        let result = CatalogQuery::from(&params(&[("search", "_")])).fetch(&db).await?;
        assert_eq!(ids(&result), Vec::<i64>::new());

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_min_price_behaves_like_absent() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let without = CatalogQuery::from(&params(&[("category", "sunglasses")]))
            .fetch(&db)
            .await?;
        let malformed = CatalogQuery::from(&params(&[
            ("category", "sunglasses"),
            ("minPrice", "cheap"),
        ]))
        .fetch(&db)
        .await?;
        assert_eq!(ids(&without), ids(&malformed));

        let negative = CatalogQuery::from(&params(&[
            ("category", "sunglasses"),
            ("minPrice", "-10"),
        ]))
        .fetch(&db)
        .await?;
        assert_eq!(ids(&without), ids(&negative));

        Ok(())
    }

    #[tokio::test]
    async fn test_combined_filters_are_the_intersection() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let singles: [(&str, &str); 4] = [
            ("category", "sunglasses"),
            ("brand", "Ray-Ban"),
            ("search", "a"),
            ("maxPrice", "500"),
        ];

        let all = id_set(&CatalogQuery::default().fetch(&db).await?);
        let mut expected = all.clone();
        for pair in singles {
            let single = id_set(&CatalogQuery::from(&params(&[pair])).fetch(&db).await?);
            // Adding one filter never widens the result
            assert!(single.is_subset(&all));
            expected = expected.intersection(&single).copied().collect();
        }

        let combined = id_set(&CatalogQuery::from(&params(&singles)).fetch(&db).await?);
        assert_eq!(combined, expected);
        assert!(!combined.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_price_sorts_are_exact_reverses() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let ascending = CatalogQuery::from(&params(&[("sort", "price-asc")]))
            .fetch(&db)
            .await?;
        let mut descending = ids(
            &CatalogQuery::from(&params(&[("sort", "price-desc")]))
                .fetch(&db)
                .await?,
        );
        descending.reverse();

        assert_eq!(ids(&ascending), descending);
        assert!(
            ascending
                .windows(2)
                .all(|w| w[0].product.price <= w[1].product.price)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_name_sorts() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let ascending = CatalogQuery::from(&params(&[("sort", "name-asc")]))
            .fetch(&db)
            .await?;
        assert!(
            ascending
                .windows(2)
                .all(|w| w[0].product.name <= w[1].product.name)
        );

        let descending = CatalogQuery::from(&params(&[("sort", "name-desc")]))
            .fetch(&db)
            .await?;
        assert!(
            descending
                .windows(2)
                .all(|w| w[0].product.name >= w[1].product.name)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_sort_matches_default_order() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;

        let default = CatalogQuery::default().fetch(&db).await?;
        let unknown = CatalogQuery::from(&params(&[("sort", "popularity")]))
            .fetch(&db)
            .await?;
        assert_eq!(ids(&default), ids(&unknown));

        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_evaluation_agrees_with_database() -> Result<()> {
        let (db, _) = setup_with_catalog().await?;
        let everything = CatalogQuery::default().fetch(&db).await?;

        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![],
            vec![("category", "sunglasses"), ("sort", "price-desc")],
            vec![("brand", "Gucci"), ("sort", "name-asc")],
            vec![("search", "ray"), ("minPrice", "100")],
            vec![("maxPrice", "200"), ("sort", "price-asc")],
            vec![("brand", "Nobody")],
            vec![("minPrice", "x"), ("sort", "name-desc")],
        ];

        for case in cases {
            let query = CatalogQuery::from(&params(&case));
            let from_db = query.fetch(&db).await?;
            let in_memory = query.apply(&everything);
            assert_eq!(ids(&from_db), ids(&in_memory), "case {case:?}");
        }

        Ok(())
    }

    #[test]
    fn test_params_serialize_skips_absent_fields() {
        let params = params(&[("minPrice", "10"), ("sort", "price-asc")]);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "minPrice": "10", "sort": "price-asc" })
        );
    }
}
