//! Client-side cart
//!
//! Every change is priced locally with the shared engine before it is
//! committed. A change the engine rejects leaves the cart untouched.
//! Subscribers receive a [`CartSnapshot`] after each committed change.

use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::{
    AppError, ErrorCode, LineItem, Modification, PriceBreakdown, PricingContext, compute_breakdown,
};
use tokio::sync::broadcast;

use crate::ClientResult;

/// Snapshot channel capacity
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable line id (UUID v4)
    pub id: String,
    pub menu_item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

impl CartLine {
    fn to_line_item(&self) -> LineItem {
        LineItem {
            unit_price: self.unit_price,
            quantity: self.quantity,
            modifications: self.modifications.clone(),
        }
    }

    fn same_item(&self, menu_item_id: i64, unit_price: f64, modifications: &[Modification]) -> bool {
        self.menu_item_id == menu_item_id
            && self.unit_price == unit_price
            && self.modifications == modifications
    }
}

/// Cart state published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub breakdown: PriceBreakdown,
}

/// On-disk cart format
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    lines: Vec<CartLine>,
    #[serde(default)]
    discount_amount: f64,
}

#[derive(Debug, Clone)]
struct CartState {
    lines: Vec<CartLine>,
    discount_amount: f64,
    breakdown: PriceBreakdown,
}

pub struct CartStore {
    context: PricingContext,
    state: RwLock<CartState>,
    snapshot_tx: broadcast::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("context", &self.context)
            .field("state", &*self.state.read())
            .field("snapshot_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart priced with `context`
    ///
    /// The context's own `discount_amount` becomes the initial cart discount.
    pub fn new(context: PricingContext) -> ClientResult<Self> {
        Self::with_lines(context, Vec::new(), context.discount_amount)
    }

    fn with_lines(
        context: PricingContext,
        lines: Vec<CartLine>,
        discount_amount: f64,
    ) -> ClientResult<Self> {
        let breakdown = price(&context, &lines, discount_amount)?;
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Ok(Self {
            context,
            state: RwLock::new(CartState {
                lines,
                discount_amount,
                breakdown,
            }),
            snapshot_tx,
        })
    }

    /// Subscribe to snapshots of committed changes
    pub fn subscribe(&self) -> broadcast::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.state.read();
        CartSnapshot {
            lines: state.lines.clone(),
            breakdown: state.breakdown,
        }
    }

    pub fn breakdown(&self) -> PriceBreakdown {
        self.state.read().breakdown
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.state.read().lines.clone()
    }

    /// Line items as sent to `/pricing/calculate`
    pub fn line_items(&self) -> Vec<LineItem> {
        self.state.read().lines.iter().map(CartLine::to_line_item).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().lines.is_empty()
    }

    /// Add an item and return the id of the line holding it
    ///
    /// An identical item (same menu item, price and modifications) already
    /// in the cart has its quantity increased instead of getting a new line.
    pub fn add_item(
        &self,
        menu_item_id: i64,
        name: impl Into<String>,
        unit_price: f64,
        quantity: i32,
        modifications: Vec<Modification>,
    ) -> ClientResult<String> {
        let name = name.into();
        self.mutate(|lines| {
            if let Some(line) = lines
                .iter_mut()
                .find(|l| l.same_item(menu_item_id, unit_price, &modifications))
            {
                // The merged line is priced like any other: a quantity
                // above MAX_QUANTITY fails validation and the cart is left
                // untouched. An overflowing sum saturates and is rejected the same way.
                line.quantity = line.quantity.saturating_add(quantity);
                return Ok(line.id.clone());
            }

            let id = uuid::Uuid::new_v4().to_string();
            lines.push(CartLine {
                id: id.clone(),
                menu_item_id,
                name,
                unit_price,
                quantity,
                modifications,
            });
            Ok(id)
        })
    }

    /// Set a line's quantity; 0 removes the line
    pub fn update_quantity(&self, line_id: &str, quantity: i32) -> ClientResult<()> {
        self.mutate(|lines| {
            let index = find_line(lines, line_id)?;
            if quantity == 0 {
                lines.remove(index);
            } else {
                lines[index].quantity = quantity;
            }
            Ok(())
        })
    }

    pub fn remove_item(&self, line_id: &str) -> ClientResult<()> {
        self.mutate(|lines| {
            let index = find_line(lines, line_id)?;
            lines.remove(index);
            Ok(())
        })
    }

    /// Remove all lines; the discount is kept
    pub fn clear(&self) -> ClientResult<()> {
        self.mutate(|lines| {
            lines.clear();
            Ok(())
        })
    }

    /// Set the order-level discount (e.g. a resolved promo amount)
    pub fn set_discount(&self, amount: f64) -> ClientResult<()> {
        let mut state = self.state.write();
        let breakdown = price(&self.context, &state.lines, amount)?;
        state.discount_amount = amount;
        state.breakdown = breakdown;
        self.publish(&state);
        Ok(())
    }

    /// Apply `change` to a copy of the lines and commit only if it prices
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<CartLine>) -> ClientResult<T>,
    ) -> ClientResult<T> {
        let mut state = self.state.write();
        let mut lines = state.lines.clone();
        let result = change(&mut lines)?;
        let breakdown = price(&self.context, &lines, state.discount_amount)?;

        state.lines = lines;
        state.breakdown = breakdown;
        self.publish(&state);
        Ok(result)
    }

    fn publish(&self, state: &CartState) {
        let snapshot = CartSnapshot {
            lines: state.lines.clone(),
            breakdown: state.breakdown,
        };
        // No subscribers is fine
        let _ = self.snapshot_tx.send(snapshot);
    }

    /// Save lines and discount as JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        let persisted = {
            let state = self.state.read();
            PersistedCart {
                lines: state.lines.clone(),
                discount_amount: state.discount_amount,
            }
        };
        let content = serde_json::to_string(&persisted)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Restore a cart saved with [`CartStore::save_to`]
    ///
    /// The saved lines are re-priced with `context`; a file whose lines no
    /// longer price is rejected.
    pub fn load_from(path: impl AsRef<Path>, context: PricingContext) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let persisted: PersistedCart = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            lines = persisted.lines.len(),
            "Cart restored"
        );
        Self::with_lines(context, persisted.lines, persisted.discount_amount)
    }
}

fn price(
    context: &PricingContext,
    lines: &[CartLine],
    discount_amount: f64,
) -> ClientResult<PriceBreakdown> {
    let items: Vec<LineItem> = lines.iter().map(CartLine::to_line_item).collect();
    let breakdown = compute_breakdown(&items, &context.with_discount(discount_amount))?;
    Ok(breakdown)
}

fn find_line(lines: &[CartLine], line_id: &str) -> ClientResult<usize> {
    lines.iter().position(|l| l.id == line_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::CartLineNotFound,
            format!("cart line {} not found", line_id),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use shared::order_money::MAX_QUANTITY;

    fn context() -> PricingContext {
        PricingContext::new(0.0875, 3.99, 25.0)
    }

    fn cart() -> CartStore {
        CartStore::new(context()).unwrap()
    }

    #[test]
    fn test_empty_cart_pays_delivery() {
        let cart = cart();
        assert!(cart.is_empty());
        let b = cart.breakdown();
        assert_eq!(b.subtotal, 0.0);
        assert_eq!(b.delivery_fee, 3.99);
        assert_eq!(b.total, 3.99);
    }

    #[test]
    fn test_add_item_prices_cart() {
        let cart = cart();
        cart.add_item(1, "Burger", 12.99, 1, vec![Modification::new("Extra cheese", 1.50)])
            .unwrap();
        let b = cart.breakdown();
        assert_eq!(b.subtotal, 14.49);
        assert_eq!(b.tax_amount, 1.27);
        assert_eq!(b.total, 19.75);
    }

    #[test]
    fn test_identical_items_merge() {
        let cart = cart();
        let a = cart.add_item(1, "Burger", 12.99, 1, vec![]).unwrap();
        let b = cart.add_item(1, "Burger", 12.99, 2, vec![]).unwrap();
        assert_eq!(a, b);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);

        let c = cart
            .add_item(1, "Burger", 12.99, 1, vec![Modification::new("No onions", -0.5)])
            .unwrap();
        assert_ne!(a, c);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_merge_past_max_quantity_rejected() {
        let cart = cart();
        cart.add_item(1, "Burger", 12.99, MAX_QUANTITY, vec![]).unwrap();

        let err = cart.add_item(1, "Burger", 12.99, 1, vec![]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Pricing(ref e) if e.code() == ErrorCode::InvalidQuantity
        ));
        let err = cart.add_item(1, "Burger", 12.99, i32::MAX, vec![]).unwrap_err();
        assert!(matches!(err, ClientError::Pricing(_)));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let cart = cart();
        let id = cart.add_item(1, "Fries", 4.0, 1, vec![]).unwrap();
        cart.update_quantity(&id, 3).unwrap();
        assert_eq!(cart.breakdown().subtotal, 12.0);

        cart.update_quantity(&id, 0).unwrap();
        assert!(cart.is_empty());

        let id = cart.add_item(2, "Soda", 2.0, 1, vec![]).unwrap();
        cart.remove_item(&id).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_line_rejected() {
        let err = cart().update_quantity("missing", 2).unwrap_err();
        match err {
            ClientError::App(e) => assert_eq!(e.code, ErrorCode::CartLineNotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_change_leaves_cart_untouched() {
        let cart = cart();
        let id = cart.add_item(1, "Pizza", 10.0, 2, vec![]).unwrap();
        let before = cart.snapshot();

        assert!(matches!(
            cart.update_quantity(&id, -1),
            Err(ClientError::Pricing(_))
        ));
        assert!(matches!(
            cart.add_item(2, "Bad", -1.0, 1, vec![]),
            Err(ClientError::Pricing(_))
        ));
        assert!(matches!(cart.set_discount(-5.0), Err(ClientError::Pricing(_))));

        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_discount_and_clear() {
        let cart = cart();
        cart.add_item(1, "Pizza", 30.0, 1, vec![]).unwrap();
        cart.set_discount(5.0).unwrap();
        let b = cart.breakdown();
        assert_eq!(b.delivery_fee, 0.0);
        assert_eq!(b.discount_amount, 5.0);
        assert_eq!(b.total, 27.62); // 30 + 2.625 -> 2.62, minus 5

        cart.clear().unwrap();
        let b = cart.breakdown();
        assert_eq!(b.discount_amount, 5.0);
        assert_eq!(b.total, 0.0); // 3.99 - 5 clamps at zero
    }

    #[test]
    fn test_snapshots_broadcast() {
        let cart = cart();
        let mut rx = cart.subscribe();

        let id = cart.add_item(1, "Tea", 3.0, 1, vec![]).unwrap();
        let snap = rx.try_recv().unwrap();
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.breakdown.subtotal, 3.0);

        // rejected change publishes nothing
        let _ = cart.update_quantity(&id, -3);
        assert!(rx.try_recv().is_err());

        cart.update_quantity(&id, 2).unwrap();
        assert_eq!(rx.try_recv().unwrap().breakdown.subtotal, 6.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        let cart = cart();
        cart.add_item(1, "Burger", 12.99, 2, vec![Modification::new("Bacon", 2.0)])
            .unwrap();
        cart.set_discount(1.5).unwrap();
        cart.save_to(&path).unwrap();

        let restored = CartStore::load_from(&path, context()).unwrap();
        assert_eq!(restored.snapshot(), cart.snapshot());

        // same lines priced under a different tax rate
        let repriced = CartStore::load_from(&path, PricingContext::new(0.0, 3.99, 25.0)).unwrap();
        assert_eq!(repriced.breakdown().tax_amount, 0.0);
        assert_eq!(repriced.lines(), cart.lines());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(
            &path,
            r#"{"lines": [{"id": "x", "menu_item_id": 1, "name": "Bad", "unit_price": 5.0, "quantity": 0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            CartStore::load_from(&path, context()),
            Err(ClientError::Pricing(_))
        ));

        assert!(matches!(
            CartStore::load_from(dir.path().join("missing.json"), context()),
            Err(ClientError::Io(_))
        ));
    }
}
