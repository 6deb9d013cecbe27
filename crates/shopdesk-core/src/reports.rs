//! Read-only reports built over the loaded records
//!
//! Every report produces plain rows plus a totals row summed over all
//! matching rows, then pages the rows the same way entity lists are paged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::filter::SearchFilter;
use crate::pagination::PageState;
use crate::query::{parse_record_date, ListQuery};
use crate::types::{date, field_number, field_text, money, record_id, text, Column, EntityKind, Record};

const BRANCH_COLUMNS: &[Column] = &[
    date("sheet_date", "Date"),
    money("expense", "Expense"),
    money("cash", "Cash"),
    money("bank", "Bank"),
    money("total_amount", "Total"),
    money("balance", "Balance"),
    text("order_count", "Orders"),
    text("delivery", "Delivered"),
];

const SALARY_COLUMNS: &[Column] = &[
    date("sheet_date", "Date"),
    text("employee_name", "Employee"),
    text("role", "Role"),
    money("base_salary", "Base Salary"),
    money("salary", "Paid"),
    money("advance_payment", "Advance"),
];

const WORKER_COLUMNS: &[Column] = &[
    text("period", "Period"),
    text("worker_name", "Worker"),
    text("mobile", "Mobile"),
    text("production_units", "Units"),
    text("overtime_hours", "Overtime"),
    money("advance_payment", "Advance"),
];

/// Fields summed per worker and period
const WORKER_SUMS: [&str; 3] = ["advance_payment", "overtime_hours", "production_units"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Branch,
    Salary,
    WorkerProgress,
    CustomerDues,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Branch,
        ReportKind::Salary,
        ReportKind::WorkerProgress,
        ReportKind::CustomerDues,
    ];

    /// URL segment
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Branch => "branch",
            ReportKind::Salary => "salary",
            ReportKind::WorkerProgress => "worker-progress",
            ReportKind::CustomerDues => "customer-dues",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Branch => "Branch Report",
            ReportKind::Salary => "Salary Report",
            ReportKind::WorkerProgress => "Worker Progress",
            ReportKind::CustomerDues => "Customers With Due",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            ReportKind::Branch => BRANCH_COLUMNS,
            ReportKind::Salary => SALARY_COLUMNS,
            ReportKind::WorkerProgress => WORKER_COLUMNS,
            ReportKind::CustomerDues => EntityKind::Customers.columns(),
        }
    }

    /// Keys summed into the totals row
    pub fn total_keys(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Branch => &[
                "expense",
                "cash",
                "bank",
                "total_amount",
                "balance",
                "order_count",
                "delivery",
            ],
            ReportKind::Salary => &["salary", "advance_payment"],
            ReportKind::WorkerProgress => &WORKER_SUMS,
            ReportKind::CustomerDues => &["due_amount"],
        }
    }

    /// Whether the report accepts a start/end date filter
    pub fn has_dates(&self) -> bool {
        !matches!(self, ReportKind::CustomerDues)
    }

    /// Whether rows are grouped by a `report_type` period
    pub fn uses_grouping(&self) -> bool {
        matches!(self, ReportKind::WorkerProgress)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "branch" | "branches" => Ok(ReportKind::Branch),
            "salary" | "salaries" => Ok(ReportKind::Salary),
            "worker-progress" | "workers" => Ok(ReportKind::WorkerProgress),
            "customer-dues" | "with-due" | "customers-with-due" => Ok(ReportKind::CustomerDues),
            _ => Err(CoreError::UnknownReport { name: s.to_string() }),
        }
    }
}

/// Period used to group worker progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Grouping {
    pub const ALL: [Grouping; 4] = [
        Grouping::Daily,
        Grouping::Weekly,
        Grouping::Monthly,
        Grouping::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Daily => "daily",
            Grouping::Weekly => "weekly",
            Grouping::Monthly => "monthly",
            Grouping::Yearly => "yearly",
        }
    }

    /// Period label of `date`; weeks are ISO weeks
    pub fn label(&self, date: NaiveDate) -> String {
        let pattern = match self {
            Grouping::Daily => "%Y-%m-%d",
            Grouping::Weekly => "%G-W%V",
            Grouping::Monthly => "%Y-%m",
            Grouping::Yearly => "%Y",
        };
        date.format(pattern).to_string()
    }
}

impl FromStr for Grouping {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "daily" => Ok(Grouping::Daily),
            "weekly" => Ok(Grouping::Weekly),
            "monthly" => Ok(Grouping::Monthly),
            "yearly" => Ok(Grouping::Yearly),
            other => Err(CoreError::InvalidQuery {
                field: "report_type".to_string(),
                message: format!("expected daily, weekly, monthly or yearly, got '{}'", other),
            }),
        }
    }
}

/// List parameters plus the report-only filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub list: ListQuery,
    pub grouping: Grouping,
    pub employee_id: Option<String>,
}

impl ReportQuery {
    pub fn new(list: ListQuery) -> Self {
        Self {
            list,
            grouping: Grouping::Daily,
            employee_id: None,
        }
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_employee(mut self, employee_id: &str) -> Self {
        let trimmed = employee_id.trim();
        self.employee_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn from_params(params: &HashMap<String, String>, default_limit: usize) -> CoreResult<Self> {
        let list = ListQuery::from_params(params, default_limit)?;
        let grouping = params
            .get("report_type")
            .map(|value| value.parse::<Grouping>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self::new(list)
            .with_grouping(grouping)
            .with_employee(params.get("employee_id").map(String::as_str).unwrap_or("")))
    }

    /// Query-string form, without `page`, for building page links
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.list.to_params();
        if self.grouping != Grouping::Daily {
            params.push(("report_type", self.grouping.as_str().to_string()));
        }
        if let Some(id) = &self.employee_id {
            params.push(("employee_id", id.clone()));
        }
        params
    }
}

/// Record sets a report reads from
#[derive(Debug, Clone, Copy)]
pub struct ReportSources<'a> {
    pub sheets: &'a [Record],
    pub progress: &'a [Record],
    pub employees: &'a [Record],
    pub customers: &'a [Record],
}

/// One page of report rows and the totals over every matching row
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub rows: Vec<Record>,
    pub totals: Record,
    pub total_count: usize,
    pub page: usize,
    pub limit: usize,
}

impl ReportPage {
    pub fn page_state(&self) -> PageState {
        PageState::new(self.page, self.total_count, self.limit)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "rows": self.rows,
            "totals": self.totals,
            "total_count": self.total_count,
            "page": self.page,
            "limit": self.limit,
        })
    }
}

/// Build `kind` over `sources` and slice out the requested page
pub fn build_report(kind: ReportKind, sources: &ReportSources<'_>, query: &ReportQuery) -> ReportPage {
    let rows = match kind {
        ReportKind::Branch => branch_rows(sources.sheets, query),
        ReportKind::Salary => salary_rows(sources.progress, sources.employees, query),
        ReportKind::WorkerProgress => worker_progress_rows(sources.progress, sources.employees, query),
        ReportKind::CustomerDues => customer_due_rows(sources.customers, query),
    };

    let totals = totals_row(kind, &rows);
    let total_count = rows.len();
    let rows = rows
        .into_iter()
        .skip(query.list.offset())
        .take(query.list.limit)
        .collect();

    ReportPage {
        rows,
        totals,
        total_count,
        page: query.list.page,
        limit: query.list.limit,
    }
}

fn search_text(query: &ReportQuery) -> &str {
    query.list.search.as_deref().unwrap_or("")
}

fn branch_rows(sheets: &[Record], query: &ReportQuery) -> Vec<Record> {
    let filter = SearchFilter::new(["sheet_date"]);
    let mut rows: Vec<Record> = filter
        .apply(sheets, search_text(query))
        .into_iter()
        .filter(|sheet| query.list.dates.contains_record(sheet, "sheet_date"))
        .map(|sheet| {
            let amount = |key: &str| field_number(sheet, key).unwrap_or(0.0);
            let total = amount("cash") + amount("bank");
            let mut row = sheet.clone();
            row.insert("total_amount".to_string(), number(total));
            row.insert("balance".to_string(), number(total - amount("expense")));
            row
        })
        .collect();
    rows.sort_by_key(|row| field_text(row, "sheet_date").unwrap_or_default());
    rows
}

fn salary_rows(progress: &[Record], employees: &[Record], query: &ReportQuery) -> Vec<Record> {
    let staff = index_by_id(employees);
    let filter = SearchFilter::new(["employee_name", "mobile"]);

    let mut rows: Vec<Record> = progress
        .iter()
        .filter(|entry| field_number(entry, "salary").is_some_and(|salary| salary > 0.0))
        .filter(|entry| query.list.dates.contains_record(entry, "sheet_date"))
        .filter_map(|entry| {
            let id = field_text(entry, "employee_id")?;
            if query.employee_id.as_deref().is_some_and(|wanted| wanted != id) {
                return None;
            }
            let employee = staff.get(id.as_str()).copied();

            let mut row = Record::new();
            copy_field(&mut row, Some(entry), "sheet_date", "sheet_date");
            row.insert("employee_id".to_string(), Value::from(id));
            copy_field(&mut row, employee, "name", "employee_name");
            copy_field(&mut row, employee, "role", "role");
            copy_field(&mut row, employee, "mobile", "mobile");
            copy_field(&mut row, employee, "base_salary", "base_salary");
            copy_field(&mut row, Some(entry), "salary", "salary");
            row.insert(
                "advance_payment".to_string(),
                number(field_number(entry, "advance_payment").unwrap_or(0.0)),
            );
            Some(row)
        })
        .filter(|row| filter.matches(row, search_text(query)))
        .collect();
    rows.sort_by_key(|row| field_text(row, "sheet_date").unwrap_or_default());
    rows
}

fn worker_progress_rows(progress: &[Record], employees: &[Record], query: &ReportQuery) -> Vec<Record> {
    let staff = index_by_id(employees);
    let filter = SearchFilter::default();
    let mut groups: BTreeMap<(String, String, String), [f64; 3]> = BTreeMap::new();

    for entry in progress {
        let Some(day) = field_text(entry, "sheet_date").and_then(|value| parse_record_date(&value)) else {
            continue;
        };
        if !query.list.dates.contains(&day) {
            continue;
        }
        let Some(id) = field_text(entry, "employee_id") else {
            continue;
        };
        let Some(worker) = staff.get(id.as_str()).copied() else {
            continue;
        };
        let is_worker = field_text(worker, "role").is_some_and(|role| role.eq_ignore_ascii_case("worker"));
        if !is_worker || !filter.matches(worker, search_text(query)) {
            continue;
        }

        let name = field_text(worker, "name").unwrap_or_default();
        let sums = groups
            .entry((query.grouping.label(day), name, id))
            .or_insert([0.0; 3]);
        for (sum, key) in sums.iter_mut().zip(WORKER_SUMS) {
            *sum += field_number(entry, key).unwrap_or(0.0);
        }
    }

    groups
        .into_iter()
        .map(|((period, name, id), sums)| {
            let worker = staff.get(id.as_str()).copied();
            let mut row = Record::new();
            row.insert("period".to_string(), Value::from(period));
            row.insert("employee_id".to_string(), Value::from(id));
            row.insert("worker_name".to_string(), Value::from(name));
            copy_field(&mut row, worker, "mobile", "mobile");
            copy_field(&mut row, worker, "base_salary", "base_salary");
            for (key, sum) in WORKER_SUMS.iter().zip(sums) {
                row.insert(key.to_string(), number(sum));
            }
            row
        })
        .collect()
}

fn customer_due_rows(customers: &[Record], query: &ReportQuery) -> Vec<Record> {
    SearchFilter::default()
        .apply(customers, search_text(query))
        .into_iter()
        .filter(|customer| field_number(customer, "due_amount").is_some_and(|due| due > 0.0))
        .filter(|customer| query.list.matches_status(customer))
        .cloned()
        .collect()
}

fn totals_row(kind: ReportKind, rows: &[Record]) -> Record {
    kind.total_keys()
        .iter()
        .map(|key| {
            let sum: f64 = rows.iter().filter_map(|row| field_number(row, key)).sum();
            (key.to_string(), number(sum))
        })
        .collect()
}

fn index_by_id(records: &[Record]) -> HashMap<String, &Record> {
    records
        .iter()
        .filter_map(|record| record_id(record).map(|id| (id, record)))
        .collect()
}

fn copy_field(row: &mut Record, from: Option<&Record>, key: &str, as_key: &str) {
    let value = from.and_then(|record| record.get(key)).cloned().unwrap_or(Value::Null);
    row.insert(as_key.to_string(), value);
}

/// Whole sums stay integers in JSON
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn employees() -> Vec<Record> {
        records(json!([
            {"id": 1, "name": "Rahim", "mobile": "01711000001", "role": "worker", "base_salary": 12000},
            {"id": 2, "name": "Karim", "mobile": "01711000002", "role": "worker", "base_salary": 11000},
            {"id": 3, "name": "Nasima", "mobile": "01711000003", "role": "salesperson", "base_salary": 15000}
        ]))
    }

    fn progress() -> Vec<Record> {
        records(json!([
            {"sheet_date": "2024-03-04", "employee_id": 1, "production_units": 10, "overtime_hours": 2, "advance_payment": 500, "salary": 0},
            {"sheet_date": "2024-03-05", "employee_id": 1, "production_units": 12, "overtime_hours": 1, "advance_payment": 0, "salary": 0},
            {"sheet_date": "2024-03-05", "employee_id": 2, "production_units": 8, "overtime_hours": 0, "advance_payment": 200, "salary": 0},
            {"sheet_date": "2024-03-11", "employee_id": 1, "production_units": 5, "overtime_hours": 0, "advance_payment": 0, "salary": 0},
            {"sheet_date": "2024-03-31", "employee_id": 1, "production_units": 0, "overtime_hours": 0, "advance_payment": 0, "salary": 12000},
            {"sheet_date": "2024-03-31", "employee_id": 3, "sale_amount": 9000, "advance_payment": 1000, "salary": 15000}
        ]))
    }

    fn sheets() -> Vec<Record> {
        records(json!([
            {"sheet_date": "2024-03-05", "expense": 300, "cash": 1000, "bank": 500, "order_count": 3, "delivery": 2},
            {"sheet_date": "2024-03-04", "expense": 100, "cash": 800, "bank": 0, "order_count": 1, "delivery": 1},
            {"sheet_date": "2024-04-01", "expense": 50, "cash": "250.50", "bank": 0, "order_count": 0, "delivery": 0}
        ]))
    }

    fn customers() -> Vec<Record> {
        records(json!([
            {"id": 1, "name": "Alice", "mobile": "01800000001", "due_amount": 1500, "status": "active"},
            {"id": 2, "name": "Bob", "mobile": "01800000002", "due_amount": 0, "status": "active"},
            {"id": 3, "name": "Carol", "mobile": "01800000003", "due_amount": "250.25", "status": "inactive"}
        ]))
    }

    fn run(kind: ReportKind, query: &ReportQuery) -> ReportPage {
        let (sheets, progress, employees, customers) = (sheets(), progress(), employees(), customers());
        let sources = ReportSources {
            sheets: &sheets,
            progress: &progress,
            employees: &employees,
            customers: &customers,
        };
        build_report(kind, &sources, query)
    }

    fn everything() -> ReportQuery {
        ReportQuery::new(ListQuery::new(1, 50))
    }

    #[test]
    fn test_report_kind_parsing() {
        assert_eq!("branch".parse::<ReportKind>().unwrap(), ReportKind::Branch);
        assert_eq!("worker_progress".parse::<ReportKind>().unwrap(), ReportKind::WorkerProgress);
        assert_eq!("with-due".parse::<ReportKind>().unwrap(), ReportKind::CustomerDues);
        assert!(matches!(
            "payroll".parse::<ReportKind>(),
            Err(CoreError::UnknownReport { .. })
        ));
        for kind in ReportKind::ALL {
            assert_eq!(kind.slug().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_grouping_labels() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(Grouping::Daily.label(day), "2024-12-30");
        assert_eq!(Grouping::Weekly.label(day), "2025-W01");
        assert_eq!(Grouping::Monthly.label(day), "2024-12");
        assert_eq!(Grouping::Yearly.label(day), "2024");
        assert!(matches!(
            "hourly".parse::<Grouping>(),
            Err(CoreError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_branch_rows_and_totals() {
        let page = run(ReportKind::Branch, &everything());
        assert_eq!(page.total_count, 3);
        assert_eq!(field_text(&page.rows[0], "sheet_date").as_deref(), Some("2024-03-04"));
        assert_eq!(page.rows[1]["total_amount"], json!(1500));
        assert_eq!(page.rows[1]["balance"], json!(1200));
        assert_eq!(page.totals["cash"], json!(2050.5));
        assert_eq!(page.totals["balance"], json!(2100.5));
        assert_eq!(page.totals["order_count"], json!(4));
    }

    #[test]
    fn test_totals_cover_every_page() {
        let query = ReportQuery::new(ListQuery::new(2, 2));
        let page = run(ReportKind::Branch, &query);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.totals["expense"], json!(450));
        assert_eq!(page.page_state().total_pages(), 2);
    }

    #[test]
    fn test_branch_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5);
        let query = ReportQuery::new(ListQuery::new(1, 50).with_dates(start, None));
        let page = run(ReportKind::Branch, &query);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.totals["delivery"], json!(2));
    }

    #[test]
    fn test_salary_rows_join_employees() {
        let page = run(ReportKind::Salary, &everything());
        assert_eq!(page.total_count, 2);
        assert_eq!(page.rows[0]["employee_name"], json!("Rahim"));
        assert_eq!(page.rows[1]["role"], json!("salesperson"));
        assert_eq!(page.totals["salary"], json!(27000));
        assert_eq!(page.totals["advance_payment"], json!(1000));

        let one = run(ReportKind::Salary, &everything().with_employee("3"));
        assert_eq!(one.total_count, 1);
        assert_eq!(one.rows[0]["base_salary"], json!(15000));

        let searched = ReportQuery::new(ListQuery::new(1, 50).with_search("rahim"));
        assert_eq!(run(ReportKind::Salary, &searched).total_count, 1);
    }

    #[test]
    fn test_worker_progress_grouping() {
        let daily = run(ReportKind::WorkerProgress, &everything());
        // salesperson entries are left out
        assert_eq!(daily.total_count, 5);
        assert_eq!(daily.rows[0]["period"], json!("2024-03-04"));
        assert_eq!(daily.rows[1]["worker_name"], json!("Karim"));
        assert_eq!(daily.totals["production_units"], json!(35));

        let weekly = run(ReportKind::WorkerProgress, &everything().with_grouping(Grouping::Weekly));
        assert_eq!(weekly.total_count, 4);
        assert_eq!(weekly.rows[0]["period"], json!("2024-W10"));
        assert_eq!(weekly.rows[1]["worker_name"], json!("Rahim"));
        assert_eq!(weekly.rows[1]["production_units"], json!(22));
        assert_eq!(weekly.rows[1]["advance_payment"], json!(500));

        let monthly = run(ReportKind::WorkerProgress, &everything().with_grouping(Grouping::Monthly));
        assert_eq!(monthly.total_count, 2);
        assert_eq!(monthly.totals, weekly.totals);
    }

    #[test]
    fn test_customer_dues() {
        let page = run(ReportKind::CustomerDues, &everything());
        assert_eq!(page.total_count, 2);
        assert_eq!(page.totals["due_amount"], json!(1750.25));

        let active = ReportQuery::new(ListQuery::new(1, 50).with_status("active"));
        let page = run(ReportKind::CustomerDues, &active);
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0]["name"], json!("Alice"));
    }

    #[test]
    fn test_empty_sources_give_zero_totals() {
        let sources = ReportSources {
            sheets: &[],
            progress: &[],
            employees: &[],
            customers: &[],
        };
        let page = build_report(ReportKind::Branch, &sources, &everything());
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.totals["cash"], json!(0));
    }

    #[test]
    fn test_query_params() {
        let params: HashMap<String, String> = [
            ("page", "2"),
            ("report_type", "Monthly"),
            ("employee_id", " 7 "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let query = ReportQuery::from_params(&params, 10).unwrap();
        assert_eq!(query.list.page, 2);
        assert_eq!(query.grouping, Grouping::Monthly);
        assert_eq!(query.employee_id.as_deref(), Some("7"));
        let back = query.to_params();
        assert!(back.contains(&("report_type", "monthly".to_string())));
        assert!(back.contains(&("employee_id", "7".to_string())));

        let mut bad = params.clone();
        bad.insert("report_type".to_string(), "hourly".to_string());
        assert!(ReportQuery::from_params(&bad, 10).is_err());
    }

    #[test]
    fn test_page_json_shape() {
        let page = run(ReportKind::CustomerDues, &ReportQuery::new(ListQuery::new(1, 1)));
        let body = page.to_json();
        assert_eq!(body["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["total_count"], json!(2));
        assert_eq!(body["totals"]["due_amount"], json!(1750.25));
    }
}
