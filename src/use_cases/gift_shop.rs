// Gift registry: owner-side shop management and the guest purchase flow that
// ends in a PIX "copia e cola" code.

use tracing::info;

use crate::domain::entities::{
    GiftProduct, GiftPurchase, GiftShop, Guest, NewGiftProduct, NewGiftPurchase, NewGiftShop,
};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::money::{format_cents, parse_price_cents};
use crate::domain::pix::{generate_pix_payload, PixRequest};
use crate::domain::ports::{Clock, GiftShopStore, GuestStore, UserStore};
use crate::use_cases::guest_access::GuestAccess;
use crate::use_cases::validation;

// Tag 26 holds the GUI sub-field (18 bytes) and the key sub-field (4 + key)
// inside a 99 byte value.
pub const MAX_PIX_KEY_LEN: usize = 77;

pub struct ShopInput {
    pub name: String,
    pub pix_key: String,
}

#[derive(Default)]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub pix_key: Option<String>,
}

pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: String,
}

#[derive(Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

pub struct ShopView {
    pub shop: GiftShop,
    pub products: Vec<GiftProduct>,
}

// Guest view of the owner's shop; every product carries its purchase records.
pub struct GuestShopView {
    pub guest: Guest,
    pub shop: GiftShop,
    pub products: Vec<(GiftProduct, Vec<GiftPurchase>)>,
}

pub struct PurchaseReceipt {
    pub purchase: GiftPurchase,
    pub product: GiftProduct,
    pub pix_code: String,
}

pub struct GiftShopUseCase<'a> {
    pub shops: &'a dyn GiftShopStore,
    pub guests: &'a dyn GuestStore,
    pub users: &'a dyn UserStore,
    pub clock: &'a dyn Clock,
    pub merchant_city: &'a str,
}

impl GiftShopUseCase<'_> {
    pub async fn create_shop(&self, user_id: i64, input: ShopInput) -> Result<GiftShop, AppError> {
        let shop = NewGiftShop {
            user_id,
            name: validation::bounded_text("name", &input.name, 1, 100)?,
            pix_key: pix_key(&input.pix_key)?,
        };
        match self.shops.insert_shop(shop).await {
            Ok(shop) => {
                info!(user_id, shop_id = shop.id, "gift shop created");
                Ok(shop)
            }
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("gift shop")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_shop(&self, user_id: i64) -> Result<ShopView, AppError> {
        let shop = self.owned_shop(user_id).await?;
        let products = self.shops.list_products(shop.id).await?;
        Ok(ShopView { shop, products })
    }

    pub async fn update_shop(&self, user_id: i64, update: ShopUpdate) -> Result<GiftShop, AppError> {
        let mut shop = self.owned_shop(user_id).await?;
        if let Some(name) = update.name {
            shop.name = validation::bounded_text("name", &name, 1, 100)?;
        }
        if let Some(key) = update.pix_key {
            shop.pix_key = pix_key(&key)?;
        }
        Ok(self.shops.update_shop(&shop).await?)
    }

    pub async fn delete_shop(&self, user_id: i64) -> Result<(), AppError> {
        if !self.shops.delete_shop(user_id).await? {
            return Err(AppError::NotFound("gift shop"));
        }
        info!(user_id, "gift shop deleted");
        Ok(())
    }

    pub async fn create_product(
        &self,
        user_id: i64,
        input: ProductInput,
    ) -> Result<GiftProduct, AppError> {
        let shop = self.owned_shop(user_id).await?;
        let product = NewGiftProduct {
            shop_id: shop.id,
            name: validation::bounded_text("name", &input.name, 1, 100)?,
            description: description(input.description)?,
            price_cents: price(&input.price)?,
            image: validation::http_url("image", &input.image)?,
        };
        Ok(self.shops.insert_product(product).await?)
    }

    pub async fn list_products(&self, user_id: i64) -> Result<Vec<GiftProduct>, AppError> {
        let shop = self.owned_shop(user_id).await?;
        Ok(self.shops.list_products(shop.id).await?)
    }

    pub async fn update_product(
        &self,
        user_id: i64,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<GiftProduct, AppError> {
        let mut product = self.owned_product(user_id, product_id).await?;
        if let Some(name) = update.name {
            product.name = validation::bounded_text("name", &name, 1, 100)?;
        }
        if update.description.is_some() {
            product.description = description(update.description)?;
        }
        if let Some(raw) = update.price {
            product.price_cents = price(&raw)?;
        }
        if let Some(image) = update.image {
            product.image = validation::http_url("image", &image)?;
        }
        Ok(self.shops.update_product(&product).await?)
    }

    pub async fn delete_product(&self, user_id: i64, product_id: i64) -> Result<(), AppError> {
        let product = self.owned_product(user_id, product_id).await?;
        self.shops.delete_product(product.id).await?;
        Ok(())
    }

    pub async fn shop_for_guest(&self, hash: &str) -> Result<GuestShopView, AppError> {
        let guest = self.resolve_guest(hash).await?;
        let shop = self.owned_shop(guest.user_id).await?;
        let products = self.shops.list_products(shop.id).await?;
        let mut purchases = self.shops.list_purchases_for_shop(shop.id).await?;

        let products = products
            .into_iter()
            .map(|product| {
                let (mine, rest): (Vec<GiftPurchase>, Vec<GiftPurchase>) = purchases
                    .drain(..)
                    .partition(|purchase| purchase.product_id == product.id);
                purchases = rest;
                (product, mine)
            })
            .collect();

        Ok(GuestShopView {
            guest,
            shop,
            products,
        })
    }

    /// Records the guest's intent to give `product_id` and returns the PIX code
    /// to pay for it. Buying the same product again returns the same record.
    pub async fn buy(&self, hash: &str, product_id: i64) -> Result<PurchaseReceipt, AppError> {
        let (guest, shop, product) = self.guest_product(hash, product_id).await?;
        let owner = self
            .users
            .find_user(shop.user_id)
            .await?
            .ok_or(AppError::NotFound("gift shop"))?;

        let request = PixRequest::new(
            format_cents(product.price_cents),
            owner.full_name,
            shop.pix_key.clone(),
            self.merchant_city,
        )
        .with_transaction_id(guest.hash_link.clone());
        let pix_code = generate_pix_payload(&request)?;

        let purchase = match self.shops.find_purchase(product.id, guest.id).await? {
            Some(existing) => existing,
            None => self.insert_purchase(product.id, guest.id).await?,
        };

        Ok(PurchaseReceipt {
            purchase,
            product,
            pix_code,
        })
    }

    pub async fn set_payment(
        &self,
        hash: &str,
        product_id: i64,
        paid: bool,
    ) -> Result<GiftPurchase, AppError> {
        let (guest, _, product) = self.guest_product(hash, product_id).await?;
        let mut purchase = self
            .shops
            .find_purchase(product.id, guest.id)
            .await?
            .ok_or(AppError::NotFound("purchase"))?;

        purchase.paid = paid;
        purchase.paid_at = paid.then(|| self.clock.now_utc());
        let purchase = self.shops.update_purchase(&purchase).await?;
        info!(guest_id = guest.id, product_id, paid, "gift payment status changed");
        Ok(purchase)
    }

    async fn insert_purchase(&self, product_id: i64, guest_id: i64) -> Result<GiftPurchase, AppError> {
        let new_purchase = NewGiftPurchase {
            product_id,
            guest_id,
            created_at: self.clock.now_utc(),
        };
        match self.shops.insert_purchase(new_purchase).await {
            Ok(purchase) => {
                info!(guest_id, product_id, "gift purchase recorded");
                Ok(purchase)
            }
            // Lost a race with a concurrent request for the same pair.
            Err(StoreError::Conflict) => self
                .shops
                .find_purchase(product_id, guest_id)
                .await?
                .ok_or_else(|| AppError::Internal("purchase vanished after conflict".to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve_guest(&self, hash: &str) -> Result<Guest, AppError> {
        GuestAccess {
            guests: self.guests,
        }
        .resolve_guest_by_hash(hash)
        .await
    }

    // Steps a, b and c for product-scoped guest actions.
    async fn guest_product(
        &self,
        hash: &str,
        product_id: i64,
    ) -> Result<(Guest, GiftShop, GiftProduct), AppError> {
        let guest = self.resolve_guest(hash).await?;
        let shop = self.owned_shop(guest.user_id).await?;
        let product = self
            .shops
            .find_product(product_id)
            .await?
            .ok_or(AppError::NotFound("product"))?;
        if product.shop_id != shop.id {
            return Err(AppError::AccessDenied("product"));
        }
        Ok((guest, shop, product))
    }

    async fn owned_shop(&self, user_id: i64) -> Result<GiftShop, AppError> {
        self.shops
            .find_shop(user_id)
            .await?
            .ok_or(AppError::NotFound("gift shop"))
    }

    async fn owned_product(&self, user_id: i64, product_id: i64) -> Result<GiftProduct, AppError> {
        let shop = self.owned_shop(user_id).await?;
        let product = self
            .shops
            .find_product(product_id)
            .await?
            .ok_or(AppError::NotFound("product"))?;
        if product.shop_id != shop.id {
            return Err(AppError::AccessDenied("product"));
        }
        Ok(product)
    }
}

fn pix_key(raw: &str) -> Result<String, AppError> {
    let key = raw.trim();
    if key.is_empty() || key.len() > MAX_PIX_KEY_LEN {
        return Err(AppError::InvalidContent(format!(
            "pix_key must be between 1 and {MAX_PIX_KEY_LEN} bytes"
        )));
    }
    Ok(key.to_string())
}

fn price(raw: &str) -> Result<i64, AppError> {
    parse_price_cents(raw).ok_or_else(|| {
        AppError::InvalidContent(
            "price must be a decimal between 0 and 99999999.99 with at most 2 fraction digits"
                .to_string(),
        )
    })
}

fn description(raw: Option<String>) -> Result<Option<String>, AppError> {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            validation::bounded_text("description", &text, 1, 1000).map(Some)
        }
        _ => Ok(None),
    }
}
