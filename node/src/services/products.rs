// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use custody_kernel::types::{ProductId, StakeholderId};
use custody_kernel::{Entity, EnumField, KernelError, Product, Stakeholder, UniqueField};

use crate::api::{CreateProductRequest, Page, UpdateProductRequest};
use crate::context::OpContext;
use crate::engine::Engine;
use crate::errors::{is_taken, EngineResult, StoreResultExt};
use crate::store::{PageRequest, ProductFilter};

impl Engine {
    #[tracing::instrument(skip(self, ctx, req), fields(sku = %req.sku))]
    pub async fn create_product(
        &self,
        ctx: &OpContext,
        req: CreateProductRequest,
    ) -> EngineResult<Product> {
        self.bounded(ctx, "create_product", async move {
            let record = req.into_record()?;
            if let Some(manufacturer) = record.manufacturer_id {
                self.require_manufacturer(manufacturer).await?;
            }

            let store = &self.repos.products;
            if is_taken(store.get_by_sku(&record.sku).await, "checking SKU")? {
                return Err(KernelError::duplicate(UniqueField::Sku).into());
            }

            let id = record.id;
            store.create(record).await.context("creating product")?;
            let created = store
                .get(id)
                .await
                .or_not_found(Entity::Product, "reading product")?;

            tracing::info!(product_id = %id, "Product created");
            Ok(created)
        })
        .await
    }

    pub async fn get_product(&self, ctx: &OpContext, id: ProductId) -> EngineResult<Product> {
        self.bounded(ctx, "get_product", async move {
            self.repos
                .products
                .get(id)
                .await
                .or_not_found(Entity::Product, "reading product")
        })
        .await
    }

    pub async fn get_product_by_sku(&self, ctx: &OpContext, sku: &str) -> EngineResult<Product> {
        self.bounded(ctx, "get_product_by_sku", async move {
            self.repos
                .products
                .get_by_sku(sku)
                .await
                .or_not_found(Entity::Product, "looking up product by SKU")
        })
        .await
    }

    #[tracing::instrument(skip(self, ctx, req), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        ctx: &OpContext,
        id: ProductId,
        req: UpdateProductRequest,
    ) -> EngineResult<Product> {
        self.bounded(ctx, "update_product", async move {
            let patch = req.into_patch()?;
            let store = &self.repos.products;
            // Existence first, so a bad product id wins over a bad manufacturer
            store
                .get(id)
                .await
                .or_not_found(Entity::Product, "reading product")?;
            if let Some(manufacturer) = patch.manufacturer_id {
                self.require_manufacturer(manufacturer).await?;
            }

            store
                .update(id, patch)
                .await
                .or_not_found(Entity::Product, "updating product")?;
            tracing::debug!("Product updated");
            store
                .get(id)
                .await
                .or_not_found(Entity::Product, "reading product")
        })
        .await
    }

    /// Removes the product, its events and their transactions.
    #[tracing::instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn delete_product(&self, ctx: &OpContext, id: ProductId) -> EngineResult<()> {
        self.bounded(ctx, "delete_product", async move {
            self.repos
                .products
                .delete(id)
                .await
                .or_not_found(Entity::Product, "deleting product")?;
            tracing::info!("Product deleted");
            Ok(())
        })
        .await
    }

    pub async fn list_products(
        &self,
        ctx: &OpContext,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> EngineResult<Page<Product>> {
        let page = self.page(page);
        self.bounded(ctx, "list_products", async move {
            let (items, total) = self
                .repos
                .products
                .list(filter, page)
                .await
                .context("listing products")?;
            Ok(Page::new(items, total, page))
        })
        .await
    }

    pub async fn products_by_manufacturer(
        &self,
        ctx: &OpContext,
        manufacturer_id: StakeholderId,
    ) -> EngineResult<Vec<Product>> {
        self.bounded(ctx, "products_by_manufacturer", async move {
            self.require_manufacturer(manufacturer_id).await?;
            self.repos
                .products
                .by_manufacturer(manufacturer_id)
                .await
                .context("scanning products by manufacturer")
        })
        .await
    }

    /// The stakeholder must exist and be of type manufacturer.
    async fn require_manufacturer(&self, id: StakeholderId) -> EngineResult<Stakeholder> {
        let stakeholder = self
            .repos
            .stakeholders
            .get(id)
            .await
            .or_not_found(Entity::Stakeholder, "reading manufacturer")?;
        if !stakeholder.is_manufacturer() {
            return Err(KernelError::invalid_enum(EnumField::StakeholderType).into());
        }
        Ok(stakeholder)
    }
}
