use repairdesk_core::{CustomerId, TechnicianId};
use repairdesk_parties::{Customer, CustomerDetails, Technician, TechnicianDetails};
use repairdesk_repairs::{RepairJob, technician_workload};

use super::{RepairShop, ServiceResult};

impl RepairShop {
    pub async fn list_customers(&self) -> ServiceResult<Vec<Customer>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_customer(&self, id: &CustomerId) -> ServiceResult<Customer> {
        self.require("customer", id.as_str()).await
    }

    pub async fn create_customer(&self, details: CustomerDetails) -> ServiceResult<Customer> {
        let customer = Customer::register(CustomerId::new(), details)?;
        self.repo.create(&customer).await?;
        tracing::info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    pub async fn update_customer(&self, id: &CustomerId, details: CustomerDetails) -> ServiceResult<Customer> {
        let current: Customer = self.require("customer", id.as_str()).await?;
        let updated = current.with_details(details)?;
        self.repo.save(&updated).await?;
        Ok(updated)
    }

    /// Jobs keep pointing at a removed customer; the board then shows no name.
    pub async fn delete_customer(&self, id: &CustomerId) -> ServiceResult<()> {
        self.require::<Customer>("customer", id.as_str()).await?;
        self.repo.delete::<Customer>(id.as_str()).await?;
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }

    pub async fn list_technicians(&self) -> ServiceResult<Vec<Technician>> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_technician(&self, id: &TechnicianId) -> ServiceResult<Technician> {
        self.require("technician", id.as_str()).await
    }

    pub async fn create_technician(&self, details: TechnicianDetails) -> ServiceResult<Technician> {
        let technician = Technician::hire(TechnicianId::new(), details)?;
        self.repo.create(&technician).await?;
        tracing::info!(technician_id = %technician.id, "technician added");
        Ok(technician)
    }

    pub async fn update_technician(
        &self,
        id: &TechnicianId,
        details: TechnicianDetails,
    ) -> ServiceResult<Technician> {
        let current: Technician = self.require("technician", id.as_str()).await?;
        let updated = current.with_details(details)?;
        self.repo.save(&updated).await?;
        Ok(updated)
    }

    pub async fn delete_technician(&self, id: &TechnicianId) -> ServiceResult<()> {
        self.require::<Technician>("technician", id.as_str()).await?;
        self.repo.delete::<Technician>(id.as_str()).await?;
        tracing::info!(technician_id = %id, "technician deleted");
        Ok(())
    }

    /// Jobs on the technician's bench (in progress or awaiting parts).
    pub async fn technician_workload(&self, id: &TechnicianId) -> ServiceResult<usize> {
        self.require::<Technician>("technician", id.as_str()).await?;
        let jobs: Vec<RepairJob> = self.repo.list().await?;
        Ok(technician_workload(&jobs, id))
    }
}
