use std::path::Path;

/// Header as it appears in the raw export (spaces, not underscores), plus
/// an extra column the loader must ignore.
const HEADER: &str = "Order Id,Sales,Order Profit Per Order,Late_delivery_risk,\
Days for shipment (scheduled),Days for shipping (real),Shipping Mode,Order Region,\
Category Name,Order Item Discount Rate,order date (DateOrders),Customer Segment";

#[derive(Debug, Clone)]
pub struct Row {
    pub order_id: String,
    pub sales: f64,
    pub profit: f64,
    pub late: bool,
    pub scheduled_days: i64,
    pub actual_days: i64,
    pub shipping_mode: String,
    pub region: String,
    pub category: String,
    pub discount_rate: f64,
    pub order_date: String,
}

impl Row {
    pub fn new(order_id: &str, sales: f64, profit: f64, late: bool, region: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            sales,
            profit,
            late,
            scheduled_days: 2,
            actual_days: if late { 4 } else { 2 },
            shipping_mode: "Standard Class".to_string(),
            region: region.to_string(),
            category: "Cleats".to_string(),
            discount_rate: 0.1,
            order_date: "1/15/2018 10:30".to_string(),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},Consumer",
            self.order_id,
            self.sales,
            self.profit,
            u8::from(self.late),
            self.scheduled_days,
            self.actual_days,
            self.shipping_mode,
            self.region,
            self.category,
            self.discount_rate,
            self.order_date,
        )
    }
}

pub fn write_orders_csv(path: &Path, rows: &[Row]) {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(&row.to_line());
        text.push('\n');
    }
    std::fs::write(path, text).expect("write orders csv");
}

/// Varied rows whose lateness depends on shipping mode and discount.
pub fn synthetic_rows(count: usize) -> Vec<Row> {
    let modes = ["Standard Class", "First Class", "Second Class", "Same Day"];
    let regions = ["Western Europe", "Central America", "South Asia", "Oceania"];
    let categories = ["Cleats", "Fishing", "Camping & Hiking", "Water Sports"];
    (0..count)
        .map(|idx| {
            let mode = idx % modes.len();
            let discount = (idx % 5) as f64 * 0.05;
            let late = mode == 1 || (mode == 2 && idx % 3 != 0) || idx % 5 >= 3;
            let mut row = Row::new(
                &format!("{}", idx / 2),
                50.0 + (idx % 17) as f64 * 10.0,
                (idx % 7) as f64 * 3.0 - 6.0,
                late,
                regions[(idx / 3) % regions.len()],
            );
            row.shipping_mode = modes[mode].to_string();
            row.category = categories[(idx / 5) % categories.len()].to_string();
            row.scheduled_days = (mode as i64 % 4) + 1;
            row.actual_days = row.scheduled_days + if late { 2 } else { 0 };
            row.discount_rate = discount;
            row.order_date = format!("{}/{}/2017 {}:15", idx % 12 + 1, idx % 28 + 1, idx % 24);
            row
        })
        .collect()
}
