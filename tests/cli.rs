mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use predicates::str::contains;

    use std::io::Write;
    use std::process::Command;
    use tempfile::{NamedTempFile, TempDir};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "sales-report";

    const EXPORT: &str = "\
Order ID,Order Date,Ship Date,Customer ID,Customer Name,Category,Sub-Category,State,Sales,Quantity,Discount,Profit
O1,2022-01-05,2022-01-07,C1,Ann,Furniture,Chairs,Ohio,100,2,0,20
O2,2022-06-10,2022-06-10,C2,Bob,Technology,Phones,Utah,200,1,0.2,-10
O3,2023-02-01,2023-02-04,C1,Ann,Furniture,Tables,Ohio,300,3,0.1,60
O4,not-a-date,2023-03-01,C3,Cy,Office Supplies,Paper,Texas,50,1,0,5
";

    fn export(contents: &str) -> Result<NamedTempFile, std::io::Error> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    /// Decimals are serialized as strings.
    fn decimal(value: &serde_json::Value) -> Option<f64> {
        value.as_str()?.parse().ok()
    }

    /// Runs from an empty directory so no stray `config.toml` is picked up.
    fn command(workdir: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.current_dir(workdir.path()).env("RUST_LOG", "off");
        Ok(cmd)
    }

    #[test]
    fn test_output__kpi_as_json() -> TestResult {
        let workdir = TempDir::new()?;
        let file = export(EXPORT)?;
        let output = command(&workdir)?
            .arg("--csv")
            .arg(file.path())
            .args(["kpi", "--format", "json"])
            .output()?;
        assert!(output.status.success());

        let kpi: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(kpi["total_orders"], 4);
        assert_eq!(kpi["total_units_sold"], 7);
        assert_eq!(decimal(&kpi["total_sales"]), Some(650.0));
        assert_eq!(decimal(&kpi["profit_margin_pct"]), Some(11.54));
        assert_eq!(kpi["total_customers"], 3);
        assert_eq!(kpi["repeat_customers"], 1);
        assert_eq!(kpi["same_day_orders"], 1);
        assert_eq!(kpi["latest_year"], 2023);
        assert_eq!(kpi["latest_year_orders"], 1);
        assert_eq!(decimal(&kpi["latest_year_growth_pct"]), Some(-50.0));
        Ok(())
    }

    #[test]
    fn test_output__same_day_delays() -> TestResult {
        let workdir = TempDir::new()?;
        let file = export(EXPORT)?;
        let output = command(&workdir)?
            .arg("--csv")
            .arg(file.path())
            .args(["delays", "--same-day", "--format", "json"])
            .output()?;
        assert!(output.status.success());

        let delays: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let rows = delays.as_array().ok_or("expected a list")?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["order_id"], "O2");
        assert_eq!(rows[0]["delay_days"], 0);
        Ok(())
    }

    #[test]
    fn test_output__customers_table() -> TestResult {
        let workdir = TempDir::new()?;
        let file = export(EXPORT)?;
        command(&workdir)?
            .arg("--csv")
            .arg(file.path())
            .arg("customers")
            .assert()
            .success()
            .stdout(contains("Most profitable customers"))
            .stdout(contains("Ann"));
        Ok(())
    }

    #[test]
    fn test_output__audit_counts_bad_dates() -> TestResult {
        let workdir = TempDir::new()?;
        let file = export(EXPORT)?;
        let output = command(&workdir)?
            .arg("--csv")
            .arg(file.path())
            .args(["audit", "--format", "json"])
            .output()?;
        assert!(output.status.success());

        let audit: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(audit["total_records"], 4);
        let order_date = audit["columns"]
            .as_array()
            .ok_or("expected columns")?
            .iter()
            .find(|c| c["column"] == "OrderDate")
            .ok_or("no Order Date entry")?;
        assert_eq!(order_date["missing"], 1);
        assert_eq!(order_date["unparseable"], 1);
        Ok(())
    }

    #[test]
    fn test_output__when_a_column_is_missing() -> TestResult {
        let workdir = TempDir::new()?;
        let without_profit: String = EXPORT
            .lines()
            .map(|line| {
                let fields: Vec<&str> = line.split(',').collect();
                format!("{}\n", fields[..fields.len() - 1].join(","))
            })
            .collect();
        let file = export(&without_profit)?;

        command(&workdir)?
            .arg("--csv")
            .arg(file.path())
            .arg("kpi")
            .assert()
            .failure()
            .stderr(contains("Profit"));
        Ok(())
    }

    #[test]
    fn test_output__normalize_dates_needs_the_database() -> TestResult {
        let workdir = TempDir::new()?;
        command(&workdir)?
            .arg("normalize-dates")
            .assert()
            .failure()
            .stderr(contains("--source postgres"));
        Ok(())
    }
}
