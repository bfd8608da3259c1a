use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::{GiftPurchase, GiftShop};
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::{
    CreateGiftShopRequest, CreateProductRequest, GiftShopResponse, GuestGiftShopResponse,
    GuestProductResponse, PaymentRequest, ProductResponse, PurchaseResponse,
    UpdateGiftShopRequest, UpdateProductRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::gift_shop::{
    GiftShopUseCase, ProductInput, ProductUpdate, ShopInput, ShopUpdate,
};

fn use_case(state: &AppState) -> GiftShopUseCase<'_> {
    GiftShopUseCase {
        shops: state.gift_shops.as_ref(),
        guests: state.guests.as_ref(),
        users: state.users.as_ref(),
        clock: state.clock.as_ref(),
        merchant_city: &state.settings.pix_merchant_city,
    }
}

#[tracing::instrument(name = "create_gift_shop", skip_all)]
pub async fn create_gift_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGiftShopRequest>,
) -> HandlerResult<GiftShop> {
    let session = authenticate(&state, &headers).await?;
    let shop = use_case(&state)
        .create_shop(
            session.user_id,
            ShopInput {
                name: payload.name,
                pix_key: payload.pix_key,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(shop))
}

#[tracing::instrument(name = "get_gift_shop", skip_all)]
pub async fn get_gift_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<GiftShopResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .get_shop(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(GiftShopResponse {
        id: view.shop.id,
        user_id: view.shop.user_id,
        name: view.shop.name,
        pix_key: view.shop.pix_key,
        products: view.products.into_iter().map(ProductResponse::from).collect(),
    }))
}

#[tracing::instrument(name = "update_gift_shop", skip_all)]
pub async fn update_gift_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateGiftShopRequest>,
) -> HandlerResult<GiftShop> {
    let session = authenticate(&state, &headers).await?;
    let shop = use_case(&state)
        .update_shop(
            session.user_id,
            ShopUpdate {
                name: payload.name,
                pix_key: payload.pix_key,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(shop))
}

#[tracing::instrument(name = "delete_gift_shop", skip_all)]
pub async fn delete_gift_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete_shop(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "create_product", skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProductRequest>,
) -> HandlerResult<ProductResponse> {
    let session = authenticate(&state, &headers).await?;
    let product = use_case(&state)
        .create_product(
            session.user_id,
            ProductInput {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                image: payload.image,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(product.into()))
}

#[tracing::instrument(name = "list_products", skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Vec<ProductResponse>> {
    let session = authenticate(&state, &headers).await?;
    let products = use_case(&state)
        .list_products(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[tracing::instrument(name = "update_product", skip_all, fields(product_id = product_id))]
pub async fn update_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> HandlerResult<ProductResponse> {
    let session = authenticate(&state, &headers).await?;
    let product = use_case(&state)
        .update_product(
            session.user_id,
            product_id,
            ProductUpdate {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                image: payload.image,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(product.into()))
}

#[tracing::instrument(name = "delete_product", skip_all, fields(product_id = product_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete_product(session.user_id, product_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "guest_gift_shop", skip_all)]
pub async fn guest_gift_shop(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<GuestGiftShopResponse> {
    let view = use_case(&state)
        .shop_for_guest(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(GuestGiftShopResponse {
        id: view.shop.id,
        name: view.shop.name,
        products: view
            .products
            .into_iter()
            .map(|(product, purchases)| GuestProductResponse {
                product: product.into(),
                purchases,
            })
            .collect(),
    }))
}

// Guest-facing: returns the purchase with its PIX "copia e cola" code.
#[tracing::instrument(name = "buy_gift", skip_all, fields(product_id = product_id))]
pub async fn buy_gift(
    State(state): State<AppState>,
    Path((guest_hash, product_id)): Path<(String, i64)>,
) -> HandlerResult<PurchaseResponse> {
    let receipt = use_case(&state)
        .buy(&guest_hash, product_id)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(PurchaseResponse {
        purchase: receipt.purchase,
        product: receipt.product.into(),
        pix_code: receipt.pix_code,
    }))
}

#[tracing::instrument(name = "set_gift_payment", skip_all, fields(product_id = product_id))]
pub async fn set_gift_payment(
    State(state): State<AppState>,
    Path((guest_hash, product_id)): Path<(String, i64)>,
    Json(payload): Json<PaymentRequest>,
) -> HandlerResult<GiftPurchase> {
    let purchase = use_case(&state)
        .set_payment(&guest_hash, product_id, payload.paid)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(purchase))
}
