//! Region renderers.
//!
//! Each widget region (category list, product grid, cart, modal, donation
//! form) is an askama template rendered from current state. A region
//! fragment always replaces the whole region: its root element carries the
//! region's id and `hx-swap-oob`, so any response can update any set of
//! regions by concatenating their fragments.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use green_earth_core::{ALL_CATEGORIES, ActiveCategory, Cart, Modal, ModalState, Plant};

use crate::error::Result;
use crate::widget::{CategoryListing, PlantListing};

/// Descriptions longer than this many characters are cut on product cards.
pub const DESCRIPTION_LIMIT: usize = 90;

/// Label of the "all" pseudo-category.
pub const ALL_CATEGORIES_LABEL: &str = "All Trees";

// =============================================================================
// View Models
// =============================================================================

/// One category filter button.
#[derive(Clone)]
pub struct CategoryButtonView {
    /// `all` or the category id.
    pub key: String,
    pub label: String,
    pub title: String,
    pub active: bool,
}

/// One product card.
#[derive(Clone)]
pub struct PlantCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Truncated for display.
    pub description: String,
    /// Formatted price.
    pub price: String,
    /// Plain decimal price, posted back by the card's add button.
    pub price_value: String,
    pub image_url: Option<String>,
}

impl From<&Plant> for PlantCardView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id.to_string(),
            name: plant.name.clone(),
            category: plant.category.clone(),
            description: truncate_description(&plant.description),
            price: plant.price.display(),
            price_value: plant.price.amount().to_string(),
            image_url: plant.image_url.clone(),
        }
    }
}

/// One cart line.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Plant shown in the detail modal.
#[derive(Clone)]
pub struct PlantDetailView {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Plant> for PlantDetailView {
    fn from(plant: &Plant) -> Self {
        Self {
            name: plant.name.clone(),
            category: plant.category.clone(),
            description: plant.description.clone(),
            price: plant.price.display(),
            image_url: plant.image_url.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Category filter list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/category_list.html")]
pub struct CategoryListTemplate {
    pub buttons: Vec<CategoryButtonView>,
    pub failed: bool,
}

/// Product grid fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<PlantCardView>,
    pub failed: bool,
}

/// Cart list and total fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_list.html")]
pub struct CartListTemplate {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

/// Detail modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/modal.html")]
pub struct ModalTemplate {
    pub open: bool,
    pub title: String,
    /// Set while loading; the fragment requests the detail for this ticket.
    pub loading_ticket: Option<u64>,
    pub detail: Option<PlantDetailView>,
    pub failed: bool,
}

/// Donation form fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/donation.html")]
pub struct DonationTemplate {
    pub thanks: bool,
}

/// Full storefront page, assembled from rendered region fragments.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: String,
    pub grid: String,
    pub cart: String,
    pub modal: String,
    pub donation: String,
}

// =============================================================================
// Renderers
// =============================================================================

/// Render the category filter list with exactly one active button.
#[must_use]
pub fn render_category_list(
    listing: &CategoryListing,
    active: &ActiveCategory,
) -> CategoryListTemplate {
    let CategoryListing::Loaded(categories) = listing else {
        return CategoryListTemplate {
            buttons: Vec::new(),
            failed: true,
        };
    };

    let all = CategoryButtonView {
        key: ALL_CATEGORIES.to_string(),
        label: ALL_CATEGORIES_LABEL.to_string(),
        title: String::new(),
        active: active.is(ALL_CATEGORIES),
    };

    let buttons = std::iter::once(all)
        .chain(categories.iter().map(|category| CategoryButtonView {
            key: category.id.to_string(),
            label: category.name.clone(),
            title: category.description.clone().unwrap_or_default(),
            active: active.is(category.id.as_str()),
        }))
        .collect();

    CategoryListTemplate {
        buttons,
        failed: false,
    }
}

/// Render the product grid; an empty or failed listing shows the
/// "no results" indicator.
#[must_use]
pub fn render_product_grid(listing: &PlantListing) -> ProductGridTemplate {
    match listing {
        PlantListing::Loaded(plants) => ProductGridTemplate {
            cards: plants.iter().map(PlantCardView::from).collect(),
            failed: false,
        },
        PlantListing::Failed => ProductGridTemplate {
            cards: Vec::new(),
            failed: true,
        },
    }
}

/// Render the cart lines and formatted total.
#[must_use]
pub fn render_cart_list(cart: &Cart) -> CartListTemplate {
    CartListTemplate {
        lines: cart
            .lines()
            .iter()
            .map(|line| CartLineView {
                id: line.item.id.to_string(),
                name: line.item.name.clone(),
                quantity: line.quantity,
                unit_price: line.item.price.display(),
                line_price: line.line_price().display(),
            })
            .collect(),
        total: cart.total().display(),
        item_count: cart.item_count(),
    }
}

/// Render the detail modal for its current state.
#[must_use]
pub fn render_modal(modal: &Modal) -> ModalTemplate {
    let closed = ModalTemplate {
        open: false,
        title: String::new(),
        loading_ticket: None,
        detail: None,
        failed: false,
    };

    match modal.state() {
        ModalState::Closed => closed,
        ModalState::Loading { ticket, .. } => ModalTemplate {
            open: true,
            title: "Loading…".to_string(),
            loading_ticket: Some(*ticket),
            ..closed
        },
        ModalState::Shown { plant } => ModalTemplate {
            open: true,
            title: plant.name.clone(),
            detail: Some(PlantDetailView::from(plant)),
            ..closed
        },
        ModalState::Error { .. } => ModalTemplate {
            open: true,
            title: "Plant details".to_string(),
            failed: true,
            ..closed
        },
    }
}

/// Cut `description` to [`DESCRIPTION_LIMIT`] characters plus an ellipsis.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_LIMIT {
        return description.to_string();
    }
    let mut cut: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    cut.push('…');
    cut
}

// =============================================================================
// Responses
// =============================================================================

/// A response made of rendered region fragments.
#[derive(Debug, Default)]
pub struct Fragments(Vec<String>);

impl Fragments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `template` and append it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Render` if the template fails to render.
    pub fn with(mut self, template: &impl Template) -> Result<Self> {
        self.0.push(template.render()?);
        Ok(self)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All fragments in order.
    #[must_use]
    pub fn into_html(self) -> String {
        self.0.concat()
    }
}

/// No fragments answers `204 No Content`, which htmx treats as "leave the
/// page alone".
impl IntoResponse for Fragments {
    fn into_response(self) -> Response {
        if self.is_empty() {
            return StatusCode::NO_CONTENT.into_response();
        }
        Html(self.into_html()).into_response()
    }
}
