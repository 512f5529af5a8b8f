//! Built-in sample shop used for demos and fresh installs.

use chrono::NaiveDate;

use repairdesk_core::{DomainResult, Money};
use repairdesk_inventory::{NewPart, Part, PartAllocation};
use repairdesk_parties::{ContactInfo, Customer, CustomerDetails, Technician, TechnicianDetails};
use repairdesk_repairs::{DeviceType, RepairCode, RepairJob, RepairStatus};

use crate::backup::Backup;

fn date(y: i32, m: u32, d: u32) -> DomainResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| repairdesk_core::DomainError::invariant(format!("bad sample date {y}-{m}-{d}")))
}

fn customer(id: &str, name: &str, phone: &str, line_id: Option<&str>, email: Option<&str>) -> DomainResult<Customer> {
    Customer::register(
        id.parse()?,
        CustomerDetails {
            name: name.to_string(),
            phone: phone.to_string(),
            contact: ContactInfo {
                email: email.map(str::to_string),
                address: None,
                line_id: line_id.map(str::to_string),
            },
        },
    )
}

fn technician(id: &str, name: &str, specialty: &str) -> DomainResult<Technician> {
    Technician::hire(
        id.parse()?,
        TechnicianDetails { name: name.to_string(), specialty: specialty.to_string() },
    )
}

fn part(id: &str, name: &str, stock: i64, price: u64) -> DomainResult<Part> {
    Part::create(
        id.parse()?,
        NewPart {
            name: name.to_string(),
            stock,
            price: Money::new(price),
            category_id: None,
            supplier_id: None,
        },
    )
}

fn alloc(part_id: &str, quantity: u32) -> DomainResult<PartAllocation> {
    Ok(PartAllocation::new(part_id.parse()?, quantity))
}

/// The sample dataset. Stock levels already account for the finished jobs.
pub fn sample_data() -> DomainResult<Backup> {
    let customers = vec![
        customer("C001", "Somchai Jaidee", "081-234-5678", Some("somchai.j"), Some("somchai.j@email.com"))?,
        customer("C002", "Somying Jingjai", "082-345-6789", None, Some("somy@email.com"))?,
        customer("C003", "Athit Tangtrong", "083-456-7890", Some("artit.t"), None)?,
    ];

    let technicians = vec![
        technician("T001", "Wichai Chamnan", "iPhone & iPad")?,
        technician("T002", "Mana Otton", "Android & Laptops")?,
        technician("T003", "Preecha Samart", "General Hardware")?,
    ];

    let parts = vec![
        part("P001", "iPhone 13 Screen", 5, 2500)?,
        part("P002", "MacBook Pro Battery A2141", 3, 3500)?,
        part("P003", "Samsung S22 Battery", 10, 1800)?,
        part("P004", "Laptop RAM DDR4 8GB", 15, 1200)?,
        part("P005", "SSD 512GB NVMe", 8, 2200)?,
    ];

    let repair_jobs = vec![
        RepairJob {
            id: "R001".parse()?,
            repair_code: RepairCode::from_sequence(1),
            customer_id: "C001".parse()?,
            technician_id: Some("T001".parse()?),
            device_type: DeviceType::Mobile,
            device_model: "iPhone 13 Pro".to_string(),
            issue_description: "Cracked screen".to_string(),
            status: RepairStatus::Completed,
            received_date: date(2023, 10, 1)?,
            completed_date: Some(date(2023, 10, 3)?),
            labor_cost: Money::new(800),
            parts_cost: Money::new(2500),
            assigned_parts: vec![alloc("P001", 1)?],
            notes: None,
        },
        RepairJob {
            id: "R002".parse()?,
            repair_code: RepairCode::from_sequence(2),
            customer_id: "C002".parse()?,
            technician_id: Some("T002".parse()?),
            device_type: DeviceType::Notebook,
            device_model: "MacBook Pro 16\"".to_string(),
            issue_description: "Battery worn out".to_string(),
            status: RepairStatus::InProgress,
            received_date: date(2023, 10, 2)?,
            completed_date: None,
            labor_cost: Money::new(1500),
            parts_cost: Money::new(3500),
            assigned_parts: vec![alloc("P002", 1)?],
            notes: Some("Customer asked for a rush job".to_string()),
        },
        RepairJob {
            id: "R003".parse()?,
            repair_code: RepairCode::from_sequence(3),
            customer_id: "C003".parse()?,
            technician_id: None,
            device_type: DeviceType::Mobile,
            device_model: "Samsung S22 Ultra".to_string(),
            issue_description: "Does not power on".to_string(),
            status: RepairStatus::AwaitingParts,
            received_date: date(2023, 10, 3)?,
            completed_date: None,
            labor_cost: Money::ZERO,
            parts_cost: Money::ZERO,
            assigned_parts: vec![],
            notes: None,
        },
        RepairJob {
            id: "R004".parse()?,
            repair_code: RepairCode::from_sequence(4),
            customer_id: "C001".parse()?,
            technician_id: Some("T002".parse()?),
            device_type: DeviceType::Notebook,
            device_model: "Dell XPS 15".to_string(),
            issue_description: "RAM and SSD upgrade".to_string(),
            status: RepairStatus::Returned,
            received_date: date(2023, 9, 25)?,
            completed_date: Some(date(2023, 9, 28)?),
            labor_cost: Money::new(1000),
            parts_cost: Money::new(3400),
            assigned_parts: vec![alloc("P004", 1)?, alloc("P005", 1)?],
            notes: None,
        },
    ];

    Ok(Backup {
        customers,
        technicians,
        parts,
        categories: vec![],
        suppliers: vec![],
        repair_jobs,
        exported_at: None,
    })
}
