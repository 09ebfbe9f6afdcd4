//! Descriptor tables for API version `2024-01`.
//!
//! These tables are data in the shape a resource generator emits: path
//! catalogue, response keys, fields and relations. Only a representative
//! subset of the platform's resources is described here.

use crate::catalogue::{
    DescriptorRegistry, EntityDescriptor, PathDescriptor, Relation, RelationKind, Resource, ResourceNames,
};
use crate::http::HttpMethod::{Delete, Get, Post, Put};

pub const API_VERSION: &str = "2024-01";

pub static PRODUCT: EntityDescriptor = EntityDescriptor {
    name: "Product",
    api_version: API_VERSION,
    resource_names: &[ResourceNames { singular: "product", plural: "products" }],
    paths: &[
        PathDescriptor { http_method: Delete, operation: "delete", ids: &["id"], path: "products/<id>.json" },
        PathDescriptor { http_method: Get, operation: "count", ids: &[], path: "products/count.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &[], path: "products.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &["id"], path: "products/<id>.json" },
        PathDescriptor { http_method: Post, operation: "post", ids: &[], path: "products.json" },
        PathDescriptor { http_method: Put, operation: "put", ids: &["id"], path: "products/<id>.json" },
    ],
    fields: &[
        "id",
        "title",
        "body_html",
        "vendor",
        "product_type",
        "handle",
        "status",
        "tags",
        "options",
        "created_at",
        "updated_at",
        "published_at",
        "admin_graphql_api_id",
    ],
    read_only: &["created_at", "updated_at", "admin_graphql_api_id"],
    relations: &[
        Relation { field: "variants", kind: RelationKind::Many, target: &VARIANT },
        Relation { field: "images", kind: RelationKind::Many, target: &IMAGE },
        Relation { field: "image", kind: RelationKind::One, target: &IMAGE },
    ],
};

pub static VARIANT: EntityDescriptor = EntityDescriptor {
    name: "Variant",
    api_version: API_VERSION,
    resource_names: &[ResourceNames { singular: "variant", plural: "variants" }],
    paths: &[
        PathDescriptor {
            http_method: Delete,
            operation: "delete",
            ids: &["product_id", "id"],
            path: "products/<product_id>/variants/<id>.json",
        },
        PathDescriptor {
            http_method: Get,
            operation: "count",
            ids: &["product_id"],
            path: "products/<product_id>/variants/count.json",
        },
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["product_id"],
            path: "products/<product_id>/variants.json",
        },
        PathDescriptor { http_method: Get, operation: "get", ids: &["id"], path: "variants/<id>.json" },
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["product_id", "id"],
            path: "products/<product_id>/variants/<id>.json",
        },
        PathDescriptor {
            http_method: Post,
            operation: "post",
            ids: &["product_id"],
            path: "products/<product_id>/variants.json",
        },
        PathDescriptor { http_method: Put, operation: "put", ids: &["id"], path: "variants/<id>.json" },
    ],
    fields: &[
        "id",
        "product_id",
        "title",
        "price",
        "sku",
        "position",
        "inventory_item_id",
        "inventory_quantity",
        "image_id",
        "created_at",
        "updated_at",
    ],
    read_only: &["inventory_quantity", "created_at", "updated_at"],
    relations: &[],
};

pub static IMAGE: EntityDescriptor = EntityDescriptor {
    name: "Image",
    api_version: API_VERSION,
    // Older payloads used a prefixed key for product images.
    resource_names: &[
        ResourceNames { singular: "image", plural: "images" },
        ResourceNames { singular: "product_image", plural: "product_images" },
    ],
    paths: &[
        PathDescriptor {
            http_method: Delete,
            operation: "delete",
            ids: &["product_id", "id"],
            path: "products/<product_id>/images/<id>.json",
        },
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["product_id"],
            path: "products/<product_id>/images.json",
        },
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["product_id", "id"],
            path: "products/<product_id>/images/<id>.json",
        },
        PathDescriptor {
            http_method: Post,
            operation: "post",
            ids: &["product_id"],
            path: "products/<product_id>/images.json",
        },
        PathDescriptor {
            http_method: Put,
            operation: "put",
            ids: &["product_id", "id"],
            path: "products/<product_id>/images/<id>.json",
        },
    ],
    fields: &["id", "product_id", "position", "src", "alt", "width", "height", "variant_ids", "created_at"],
    read_only: &["width", "height", "created_at"],
    relations: &[],
};

pub static CUSTOMER: EntityDescriptor = EntityDescriptor {
    name: "Customer",
    api_version: API_VERSION,
    resource_names: &[ResourceNames { singular: "customer", plural: "customers" }],
    paths: &[
        PathDescriptor { http_method: Delete, operation: "delete", ids: &["id"], path: "customers/<id>.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &[], path: "customers.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &["id"], path: "customers/<id>.json" },
        PathDescriptor { http_method: Get, operation: "orders", ids: &["id"], path: "customers/<id>/orders.json" },
        PathDescriptor { http_method: Get, operation: "search", ids: &[], path: "customers/search.json" },
        PathDescriptor { http_method: Post, operation: "post", ids: &[], path: "customers.json" },
        PathDescriptor { http_method: Put, operation: "put", ids: &["id"], path: "customers/<id>.json" },
    ],
    fields: &["id", "email", "first_name", "last_name", "phone", "orders_count", "total_spent", "created_at"],
    read_only: &["orders_count", "total_spent", "created_at"],
    relations: &[Relation { field: "default_address", kind: RelationKind::One, target: &ADDRESS }],
};

pub static ADDRESS: EntityDescriptor = EntityDescriptor {
    name: "CustomerAddress",
    api_version: API_VERSION,
    resource_names: &[
        ResourceNames { singular: "customer_address", plural: "addresses" },
        ResourceNames { singular: "address", plural: "customer_addresses" },
    ],
    paths: &[
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["customer_id"],
            path: "customers/<customer_id>/addresses.json",
        },
        PathDescriptor {
            http_method: Get,
            operation: "get",
            ids: &["customer_id", "id"],
            path: "customers/<customer_id>/addresses/<id>.json",
        },
        PathDescriptor {
            http_method: Put,
            operation: "default",
            ids: &["customer_id", "id"],
            path: "customers/<customer_id>/addresses/<id>/default.json",
        },
    ],
    fields: &["id", "customer_id", "address1", "city", "province", "country", "zip", "default"],
    read_only: &[],
    relations: &[],
};

pub static ORDER: EntityDescriptor = EntityDescriptor {
    name: "Order",
    api_version: API_VERSION,
    resource_names: &[ResourceNames { singular: "order", plural: "orders" }],
    paths: &[
        PathDescriptor { http_method: Delete, operation: "delete", ids: &["id"], path: "orders/<id>.json" },
        PathDescriptor { http_method: Get, operation: "count", ids: &[], path: "orders/count.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &[], path: "orders.json" },
        PathDescriptor { http_method: Get, operation: "get", ids: &["id"], path: "orders/<id>.json" },
        PathDescriptor { http_method: Post, operation: "cancel", ids: &["id"], path: "orders/<id>/cancel.json" },
        PathDescriptor { http_method: Post, operation: "close", ids: &["id"], path: "orders/<id>/close.json" },
        PathDescriptor { http_method: Post, operation: "post", ids: &[], path: "orders.json" },
        PathDescriptor { http_method: Put, operation: "put", ids: &["id"], path: "orders/<id>.json" },
    ],
    fields: &[
        "id",
        "name",
        "email",
        "financial_status",
        "fulfillment_status",
        "total_price",
        "currency",
        "note",
        "tags",
        "created_at",
        "processed_at",
    ],
    read_only: &["name", "total_price", "created_at"],
    relations: &[
        Relation { field: "customer", kind: RelationKind::One, target: &CUSTOMER },
        Relation { field: "line_items", kind: RelationKind::Many, target: &LINE_ITEM },
        Relation { field: "billing_address", kind: RelationKind::One, target: &ADDRESS },
        Relation { field: "shipping_address", kind: RelationKind::One, target: &ADDRESS },
    ],
};

pub static LINE_ITEM: EntityDescriptor = EntityDescriptor {
    name: "LineItem",
    api_version: API_VERSION,
    resource_names: &[ResourceNames { singular: "line_item", plural: "line_items" }],
    paths: &[],
    fields: &["id", "variant_id", "product_id", "title", "quantity", "price", "sku"],
    read_only: &[],
    relations: &[],
};

pub struct Product;
pub struct Variant;
pub struct Image;
pub struct Customer;
pub struct CustomerAddress;
pub struct Order;
pub struct LineItem;

impl Resource for Product {
    const DESCRIPTOR: &'static EntityDescriptor = &PRODUCT;
}

impl Resource for Variant {
    const DESCRIPTOR: &'static EntityDescriptor = &VARIANT;
}

impl Resource for Image {
    const DESCRIPTOR: &'static EntityDescriptor = &IMAGE;
}

impl Resource for Customer {
    const DESCRIPTOR: &'static EntityDescriptor = &CUSTOMER;
}

impl Resource for CustomerAddress {
    const DESCRIPTOR: &'static EntityDescriptor = &ADDRESS;
}

impl Resource for Order {
    const DESCRIPTOR: &'static EntityDescriptor = &ORDER;
}

impl Resource for LineItem {
    const DESCRIPTOR: &'static EntityDescriptor = &LINE_ITEM;
}

/// Registry of every descriptor in this version.
pub fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    registry.register(&PRODUCT);
    registry.register(&ORDER);
    registry
}
