//! Record kinds shown by the dashboard

use serde::{Deserialize, Serialize};

/// A single record as stored in the data files
pub type Record = serde_json::Map<String, serde_json::Value>;

/// How a column value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    Text,
    Money,
    Date,
}

/// Table column of a list page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub format: ColumnFormat,
}

pub(crate) const fn text(key: &'static str, label: &'static str) -> Column {
    Column { key, label, format: ColumnFormat::Text }
}

pub(crate) const fn money(key: &'static str, label: &'static str) -> Column {
    Column { key, label, format: ColumnFormat::Money }
}

pub(crate) const fn date(key: &'static str, label: &'static str) -> Column {
    Column { key, label, format: ColumnFormat::Date }
}

/// Record kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employees,
    Customers,
    Suppliers,
    Products,
    Purchases,
    Transactions,
    Orders,
    Sales,
    /// Daily branch top sheets
    Sheets,
    /// Daily per-employee progress entries
    Progress,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Employees,
        EntityKind::Customers,
        EntityKind::Suppliers,
        EntityKind::Products,
        EntityKind::Purchases,
        EntityKind::Transactions,
        EntityKind::Orders,
        EntityKind::Sales,
        EntityKind::Sheets,
        EntityKind::Progress,
    ];

    /// Plural name, used for file stems, routes and JSON list keys
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Employees => "employees",
            EntityKind::Customers => "customers",
            EntityKind::Suppliers => "suppliers",
            EntityKind::Products => "products",
            EntityKind::Purchases => "purchases",
            EntityKind::Transactions => "transactions",
            EntityKind::Orders => "orders",
            EntityKind::Sales => "sales",
            EntityKind::Sheets => "sheets",
            EntityKind::Progress => "progress",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Employees => "Employees",
            EntityKind::Customers => "Customers",
            EntityKind::Suppliers => "Suppliers",
            EntityKind::Products => "Products",
            EntityKind::Purchases => "Purchases",
            EntityKind::Transactions => "Transactions",
            EntityKind::Orders => "Orders",
            EntityKind::Sales => "Sales",
            EntityKind::Sheets => "Daily Sheets",
            EntityKind::Progress => "Employee Progress",
        }
    }

    /// Fields matched by the search box
    pub fn search_keys(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Employees | EntityKind::Customers | EntityKind::Suppliers => {
                &["name", "mobile"]
            }
            EntityKind::Products => &["product_name"],
            EntityKind::Purchases => &["memo_no", "supplier_name"],
            EntityKind::Transactions => &[
                "transaction_id",
                "memo_no",
                "from_account_name",
                "to_account_name",
            ],
            EntityKind::Orders | EntityKind::Sales => {
                &["memo_no", "customer_name", "salesperson_name"]
            }
            EntityKind::Sheets | EntityKind::Progress => &["sheet_date"],
        }
    }

    /// Field checked by the date range filter, if the kind has one
    pub fn date_field(&self) -> Option<&'static str> {
        match self {
            EntityKind::Purchases => Some("purchase_date"),
            EntityKind::Transactions => Some("transaction_date"),
            EntityKind::Orders => Some("order_date"),
            EntityKind::Sales => Some("sale_date"),
            EntityKind::Sheets | EntityKind::Progress => Some("sheet_date"),
            _ => None,
        }
    }

    /// Values offered by the status filter; empty when the kind has no status
    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Employees | EntityKind::Customers | EntityKind::Suppliers => {
                &["active", "inactive"]
            }
            EntityKind::Orders => &["pending", "partial", "delivered", "cancelled"],
            _ => &[],
        }
    }

    /// Field used as the display name in autocomplete suggestions
    pub fn label_field(&self) -> &'static str {
        match self {
            EntityKind::Products => "product_name",
            EntityKind::Purchases | EntityKind::Orders | EntityKind::Sales => "memo_no",
            EntityKind::Transactions => "transaction_id",
            EntityKind::Sheets | EntityKind::Progress => "sheet_date",
            _ => "name",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        const EMPLOYEES: &[Column] = &[
            text("name", "Name"),
            text("role", "Role"),
            text("mobile", "Mobile"),
            money("base_salary", "Base Salary"),
            date("joining_date", "Joined"),
            text("status", "Status"),
        ];
        const CUSTOMERS: &[Column] = &[
            text("name", "Name"),
            text("mobile", "Mobile"),
            text("address", "Address"),
            money("due_amount", "Due"),
            text("status", "Status"),
        ];
        const SUPPLIERS: &[Column] = &[
            text("name", "Name"),
            text("mobile", "Mobile"),
            text("status", "Status"),
        ];
        const PRODUCTS: &[Column] = &[
            text("product_name", "Product"),
            text("current_stock_level", "In Stock"),
        ];
        const PURCHASES: &[Column] = &[
            text("memo_no", "Memo"),
            date("purchase_date", "Date"),
            text("supplier_name", "Supplier"),
            money("total_amount", "Total"),
        ];
        const TRANSACTIONS: &[Column] = &[
            text("transaction_id", "ID"),
            date("transaction_date", "Date"),
            text("memo_no", "Memo"),
            text("from_account_name", "From"),
            text("to_account_name", "To"),
            money("amount", "Amount"),
            text("transaction_type", "Type"),
        ];
        const ORDERS: &[Column] = &[
            text("memo_no", "Memo"),
            date("order_date", "Date"),
            text("customer_name", "Customer"),
            text("salesperson_name", "Salesperson"),
            text("total_items", "Items"),
            text("delivered_items", "Delivered"),
            money("total_amount", "Total"),
            money("received_amount", "Received"),
            text("status", "Status"),
        ];
        const SALES: &[Column] = &[
            text("memo_no", "Memo"),
            date("sale_date", "Date"),
            text("customer_name", "Customer"),
            text("salesperson_name", "Salesperson"),
            text("total_items", "Items"),
            money("total_amount", "Total"),
            money("received_amount", "Received"),
        ];
        const SHEETS: &[Column] = &[
            date("sheet_date", "Date"),
            money("expense", "Expense"),
            money("cash", "Cash"),
            money("bank", "Bank"),
            text("order_count", "Orders"),
            text("delivery", "Delivered"),
            text("cancelled", "Cancelled"),
            text("ready_made", "Ready-made"),
            money("sales_amount", "Sales"),
        ];
        const PROGRESS: &[Column] = &[
            date("sheet_date", "Date"),
            text("employee_id", "Employee"),
            money("sale_amount", "Sales"),
            text("order_count", "Orders"),
            text("production_units", "Units"),
            text("overtime_hours", "Overtime"),
            money("advance_payment", "Advance"),
            money("salary", "Salary"),
        ];

        match self {
            EntityKind::Employees => EMPLOYEES,
            EntityKind::Customers => CUSTOMERS,
            EntityKind::Suppliers => SUPPLIERS,
            EntityKind::Products => PRODUCTS,
            EntityKind::Purchases => PURCHASES,
            EntityKind::Transactions => TRANSACTIONS,
            EntityKind::Orders => ORDERS,
            EntityKind::Sales => SALES,
            EntityKind::Sheets => SHEETS,
            EntityKind::Progress => PROGRESS,
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employees" | "employee" => Ok(EntityKind::Employees),
            "customers" | "customer" => Ok(EntityKind::Customers),
            "suppliers" | "supplier" => Ok(EntityKind::Suppliers),
            "products" | "product" => Ok(EntityKind::Products),
            "purchases" | "purchase" => Ok(EntityKind::Purchases),
            "transactions" | "transaction" => Ok(EntityKind::Transactions),
            "orders" | "order" => Ok(EntityKind::Orders),
            "sales" | "sale" => Ok(EntityKind::Sales),
            "sheets" | "sheet" | "top_sheet" | "top_sheets" => Ok(EntityKind::Sheets),
            "progress" | "employee_progress" | "employees_progress" => Ok(EntityKind::Progress),
            _ => Err(format!("Invalid entity kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.plural())
    }
}

/// Text form of a record field, as shown in tables and matched by search
pub fn field_text(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Numeric value of a record field; numeric strings are accepted
pub fn field_number(record: &Record, key: &str) -> Option<f64> {
    match record.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Identifier of a record as text, from its `id` field
pub fn record_id(record: &Record) -> Option<String> {
    field_text(record, "id")
}
