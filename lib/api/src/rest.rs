use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use actix_cors::Cors;
use serde::Serialize;
use std::sync::Arc;

use wovenx_core::{
    Catalog, EntityCounts, Error, Page, PageRequest, Result, StockFilter, StockListItem,
    VariantFilter, VariantListItem, WovenFilter, WovenListItem,
};

/// Raw query pairs. Decoded by hand so that repeatable parameters
/// (`color_name`) work and type mismatches surface as a 400 with a
/// `detail` body instead of the framework default.
struct Params(Vec<(String, String)>);

impl Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Every value supplied for `key`, empty strings dropped.
    fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        self.get(key)
            .map(|v| {
                v.parse::<u32>().map_err(|_| {
                    Error::InvalidParameter(format!("{key} must be a non-negative integer"))
                })
            })
            .transpose()
    }

    fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|v| {
                v.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| Error::InvalidParameter(format!("{key} must be a number")))
            })
            .transpose()
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key)
            .map(|v| match v.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(Error::InvalidParameter(format!("{key} must be a boolean"))),
            })
            .transpose()
    }

    fn page_request(&self) -> Result<PageRequest> {
        PageRequest::new(self.get_u32("page")?, self.get_u32("page_size")?)
    }
}

fn parse_id(raw: &str, kind: &str) -> Result<u32> {
    raw.parse()
        .map_err(|_| Error::InvalidParameter(format!("{kind} id must be an integer")))
}

#[derive(Serialize)]
struct Detail {
    detail: String,
}

fn respond<T: Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(Detail {
            detail: e.to_string(),
        }),
        Err(Error::InvalidParameter(detail)) => {
            HttpResponse::BadRequest().json(Detail { detail })
        }
        Err(e) => HttpResponse::InternalServerError().json(Detail {
            detail: e.to_string(),
        }),
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(catalog: Arc<Catalog>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(catalog.clone()))
                .configure(routes)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// The full route table, shared between the server and the handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/wovens", web::get().to(list_wovens))
        .route("/wovens/{id}", web::get().to(get_woven))
        .route("/variants", web::get().to(list_variants))
        .route("/variants/{id}", web::get().to(get_variant))
        .route("/stock", web::get().to(list_stock))
        .route("/pantone-colors", web::get().to(list_pantone_colors))
        .route("/pantone-colors/detail", web::get().to(get_pantone_color))
        .route("/filters/colors", web::get().to(filter_colors))
        .route("/filters/categories", web::get().to(filter_categories))
        .route("/filters/references", web::get().to(filter_references))
        .route("/filters/draws", web::get().to(filter_draws))
        .route("/health", web::get().to(health));
}

async fn list_wovens(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<Vec<(String, String)>>,
) -> ActixResult<HttpResponse> {
    let params = Params(query.into_inner());
    Ok(respond(list_wovens_inner(&catalog, &params)))
}

fn list_wovens_inner(catalog: &Catalog, params: &Params) -> Result<Page<WovenListItem>> {
    let request = params.page_request()?;
    let filter = WovenFilter {
        reference: params.get_owned("reference"),
        draw: params.get_owned("draw"),
    };
    Ok(catalog.list_wovens(&filter, request))
}

async fn get_woven(
    catalog: web::Data<Arc<Catalog>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let result = parse_id(&path, "woven").and_then(|id| catalog.woven_detail(id));
    Ok(respond(result))
}

async fn list_variants(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<Vec<(String, String)>>,
) -> ActixResult<HttpResponse> {
    let params = Params(query.into_inner());
    Ok(respond(list_variants_inner(&catalog, &params)))
}

fn list_variants_inner(catalog: &Catalog, params: &Params) -> Result<Page<VariantListItem>> {
    let request = params.page_request()?;
    let filter = VariantFilter {
        color_names: params.get_all("color_name"),
        category: params.get_owned("category"),
        reference: params.get_owned("reference"),
        draw: params.get_owned("draw"),
        in_stock: params.get_bool("in_stock")?,
    };
    Ok(catalog.list_variants(&filter, request))
}

async fn get_variant(
    catalog: web::Data<Arc<Catalog>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let result = parse_id(&path, "variant").and_then(|id| catalog.variant_detail(id));
    Ok(respond(result))
}

async fn list_stock(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<Vec<(String, String)>>,
) -> ActixResult<HttpResponse> {
    let params = Params(query.into_inner());
    Ok(respond(list_stock_inner(&catalog, &params)))
}

fn list_stock_inner(catalog: &Catalog, params: &Params) -> Result<Page<StockListItem>> {
    let request = params.page_request()?;
    let filter = StockFilter {
        variant_id: params.get_u32("variant_id")?,
        perfect_match: params.get_bool("perfect_match")?,
        min_quantity: params.get_f64("min_quantity")?,
        description: params.get_owned("description"),
    };
    Ok(catalog.list_stock(&filter, request))
}

async fn list_pantone_colors(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.list_pantone()))
}

async fn get_pantone_color(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<Vec<(String, String)>>,
) -> ActixResult<HttpResponse> {
    let params = Params(query.into_inner());
    let result = params
        .get("name")
        .ok_or_else(|| Error::InvalidParameter("name is required".to_string()))
        .and_then(|name| catalog.pantone_detail(name));
    Ok(respond(result))
}

async fn filter_colors(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.color_vocab()))
}

async fn filter_categories(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.category_vocab()))
}

async fn filter_references(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.reference_vocab()))
}

async fn filter_draws(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.draw_vocab()))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    counts: EntityCounts,
}

async fn health(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        store: "connected",
        counts: catalog.counts(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;
    use wovenx_core::{PantoneColor, SimilarityEdge, Stock, Variant, Woven};

    fn fixture() -> Arc<Catalog> {
        let wovens = vec![
            Woven {
                id: 1,
                reference: "4612".to_string(),
                draw: "Herringbone".to_string(),
                composition: "100% CO".to_string(),
                date: None,
                finishing: Some("calendered".to_string()),
                category: None,
                yarns: vec![],
            },
            Woven {
                id: 2,
                reference: "9999".to_string(),
                draw: "Plain".to_string(),
                composition: "100% LI".to_string(),
                date: None,
                finishing: None,
                category: None,
                yarns: vec![],
            },
        ];
        let variants = vec![
            Variant::new(
                10,
                1,
                "001".to_string(),
                Some("Jacquard".to_string()),
                vec!["white".to_string(), "blue".to_string()],
                vec!["#ffffff".to_string(), "#0000ff".to_string()],
                "10.jpg".to_string(),
                None,
            ),
            Variant::new(
                11,
                1,
                "002".to_string(),
                Some("Jacquard".to_string()),
                vec!["white".to_string()],
                vec!["#ffffff".to_string()],
                "11.jpg".to_string(),
                None,
            ),
            Variant::new(
                12,
                2,
                "001".to_string(),
                Some("Xadrez".to_string()),
                vec!["red".to_string()],
                vec!["#ff0000".to_string()],
                "12.jpg".to_string(),
                None,
            ),
        ];
        let stocks = vec![Stock {
            id: 1,
            variant_id: 10,
            description: "Warehouse A".to_string(),
            quantity: 0.0,
            perfect_match: true,
        }];
        let pantone = vec![PantoneColor {
            name: "PANTONE Yellow C".to_string(),
            hex: "#FEDD00".to_string(),
            nearests: vec![12, 10],
        }];
        let similarity = vec![(
            10u32,
            vec![SimilarityEdge {
                variant_id: 11,
                score_percent: 90.0,
            }],
        )];

        Arc::new(
            Catalog::builder()
                .wovens(wovens)
                .variants(variants)
                .stocks(stocks)
                .pantone_colors(pantone)
                .similarity(similarity)
                .build(),
        )
    }

    async fn get(path: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fixture()))
                .configure(routes),
        )
        .await;
        let req = test::TestRequest::get().uri(path).to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_list_wovens_partial_reference_match() {
        let (status, body) = get("/wovens?reference=46").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["reference"], "4612");
        assert_eq!(body["items"][0]["variant_count"], 2);
    }

    #[actix_web::test]
    async fn test_list_wovens_envelope_defaults() {
        let (status, body) = get("/wovens").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["page_size"], 50);
        assert_eq!(body["total"], 2);
        assert_eq!(body["total_pages"], 1);
    }

    #[actix_web::test]
    async fn test_page_size_above_max_clamped() {
        let (status, body) = get("/wovens?page_size=101").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_size"], 100);
    }

    #[actix_web::test]
    async fn test_page_zero_rejected() {
        let (status, body) = get("/wovens?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "page must be >= 1");
    }

    #[actix_web::test]
    async fn test_non_numeric_page_rejected() {
        let (status, body) = get("/wovens?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("page"));
    }

    #[actix_web::test]
    async fn test_repeated_color_name_is_and() {
        let (_, body) = get("/variants?color_name=white&color_name=blue").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["id"], 10);

        let (_, body) = get("/variants?color_name=white").await;
        assert_eq!(body["total"], 2);
    }

    #[actix_web::test]
    async fn test_in_stock_includes_zero_quantity() {
        let (_, body) = get("/variants?in_stock=true").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["id"], 10);

        let (_, body) = get("/variants?in_stock=false").await;
        assert_eq!(body["total"], 2);
    }

    #[actix_web::test]
    async fn test_bad_boolean_rejected() {
        let (status, body) = get("/variants?in_stock=maybe").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "in_stock must be a boolean");
    }

    #[actix_web::test]
    async fn test_variant_detail_and_not_found() {
        let (status, body) = get("/variants/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variant_ref"], "001");
        assert_eq!(body["woven"]["reference"], "4612");
        assert_eq!(body["similarity"][0]["id"], 11);

        let (status, body) = get("/variants/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Variant with ID 404 not found");
    }

    #[actix_web::test]
    async fn test_non_numeric_variant_id_is_validation_error() {
        let (status, _) = get("/variants/xyz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_stock_filters() {
        let (_, body) = get("/stock?min_quantity=0").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["variant"]["reference"], "4612");

        let (_, body) = get("/stock?min_quantity=1").await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["total_pages"], 0);
    }

    #[actix_web::test]
    async fn test_pantone_detail_by_exact_name() {
        let (status, body) = get("/pantone-colors/detail?name=PANTONE%20Yellow%20C").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = body["nearest"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, [12, 10]);
        assert_eq!(body["nearest"][0]["has_stock"], false);
        assert_eq!(body["nearest"][1]["has_stock"], true);

        let (status, body) = get("/pantone-colors/detail?name=NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Pantone color 'NOPE' not found");
    }

    #[actix_web::test]
    async fn test_pantone_list() {
        let (_, body) = get("/pantone-colors").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["nearest_count"], 2);
    }

    #[actix_web::test]
    async fn test_filter_vocab() {
        let (_, body) = get("/filters/colors").await;
        assert_eq!(body, serde_json::json!(["blue", "red", "white"]));

        let (_, body) = get("/filters/references").await;
        assert_eq!(body, serde_json::json!(["4612", "9999"]));
    }

    #[actix_web::test]
    async fn test_health_reports_counts() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["counts"]["wovens"], 2);
        assert_eq!(body["counts"]["variants"], 3);
    }
}
