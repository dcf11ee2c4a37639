use super::OrderRecord;

pub(crate) const ORDER_ID: &str = "Order_Id";
pub(crate) const SALES: &str = "Sales";
pub(crate) const PROFIT: &str = "Order_Profit_Per_Order";
pub(crate) const LATE_RISK: &str = "Late_delivery_risk";
pub(crate) const SCHEDULED_DAYS: &str = "Days_for_shipment_(scheduled)";
pub(crate) const ACTUAL_DAYS: &str = "Days_for_shipping_(real)";
pub(crate) const SHIPPING_MODE: &str = "Shipping_Mode";
pub(crate) const REGION: &str = "Order_Region";
pub(crate) const CATEGORY: &str = "Category_Name";
pub(crate) const DISCOUNT_RATE: &str = "Order_Item_Discount_Rate";
pub(crate) const ORDER_DATE: &str = "order_date_(DateOrders)";

/// Header names every input file must provide (after [`normalize_header`]).
pub const REQUIRED_COLUMNS: [&str; 11] = [
    ORDER_ID,
    SALES,
    PROFIT,
    LATE_RISK,
    SCHEDULED_DAYS,
    ACTUAL_DAYS,
    SHIPPING_MODE,
    REGION,
    CATEGORY,
    DISCOUNT_RATE,
    ORDER_DATE,
];

/// Map a raw header onto the contract spelling.
///
/// The raw export uses spaces (`Order Id`) where the contract uses
/// underscores (`Order_Id`); both spellings are accepted.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').replace(' ', "_")
}

/// Categorical columns that filters and groupings can key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalColumn {
    ShippingMode,
    Region,
    Category,
}

impl CategoricalColumn {
    pub fn value(self, record: &OrderRecord) -> &str {
        match self {
            Self::ShippingMode => &record.shipping_mode,
            Self::Region => &record.region,
            Self::Category => &record.category,
        }
    }
}
