//! Barcode lookup
//!
//! Resolves scanned codes into products and feeds them into a [`Cart`].
//! A failed lookup is never fatal: the caller reports it and keeps scanning.

use shared::Product;
use tracing::{info, instrument, warn};

use crate::api::StoreApi;
use crate::cart::{Cart, CartLine};
use crate::error::{PosError, PosResult};
use crate::http::HttpClient;

/// Barcode lookup gateway
#[derive(Debug, Clone)]
pub struct BarcodeScanner<C: HttpClient> {
    api: StoreApi<C>,
}

impl<C: HttpClient> BarcodeScanner<C> {
    pub fn new(api: StoreApi<C>) -> Self {
        Self { api }
    }

    /// Look up a product by barcode
    ///
    /// Returns `Ok(None)` without any request when the code is blank after
    /// trimming. Every backend or transport failure becomes
    /// [`PosError::ProductNotFound`].
    #[instrument(skip(self))]
    pub async fn lookup(&self, code: &str) -> PosResult<Option<Product>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        match self.api.products().by_barcode(code).await {
            Ok(product) => Ok(Some(product)),
            Err(source) => {
                warn!(code, error = %source, "Barcode lookup failed");
                Err(PosError::ProductNotFound {
                    code: code.to_string(),
                    source,
                })
            }
        }
    }

    /// Look up `code` and add one unit to `cart`
    ///
    /// Returns the updated line, or `None` for a blank code.
    pub async fn scan<'c>(&self, cart: &'c mut Cart, code: &str) -> PosResult<Option<&'c CartLine>> {
        let Some(product) = self.lookup(code).await? else {
            return Ok(None);
        };
        let line = cart.add_or_increment(product);
        info!(
            product_id = %line.product_id(),
            quantity = line.quantity,
            "Product added to cart"
        );
        Ok(Some(line))
    }
}
