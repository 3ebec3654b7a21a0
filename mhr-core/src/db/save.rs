use tracing::debug;

use crate::calculations::MachineHourRateCalculator;
use crate::db::repository::{MachineRepository, RepositoryError};
use crate::models::{MachineInput, MachineRecord, NewMachineRecord};

/// Whether [`save_machine`] inserted a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Created,
    Updated,
}

/// Calculates `input` and stores it under `machine_name`, replacing any
/// machine already saved with that name.
///
/// An existing record keeps its id and `created_at`. The returned record is
/// read back from the repository, so it carries the backend's timestamps.
pub async fn save_machine<R: MachineRepository + ?Sized>(
    repo: &R,
    calculator: &MachineHourRateCalculator,
    machine_name: &str,
    input: MachineInput,
) -> Result<(MachineRecord, SaveAction), RepositoryError> {
    let output = calculator.output(&input);

    match repo.get_machine_by_name(machine_name).await {
        Ok(mut existing) => {
            existing.input = input;
            existing.output = Some(output);
            repo.update_machine(&existing).await?;
            debug!(id = existing.id, machine_name, "Updated machine");
            let saved = repo.get_machine(existing.id).await?;
            Ok((saved, SaveAction::Updated))
        }
        Err(RepositoryError::NotFound) => {
            let saved = repo
                .create_machine(NewMachineRecord {
                    machine_name: machine_name.to_string(),
                    input,
                    output: Some(output),
                })
                .await?;
            debug!(id = saved.id, machine_name, "Created machine");
            Ok((saved, SaveAction::Created))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::LaborInput;
    use crate::calculations::common::round_half_up;

    /// Keeps records in memory, assigning ids from 1.
    #[derive(Default)]
    struct MemoryRepository {
        machines: Mutex<Vec<MachineRecord>>,
        broken: bool,
    }

    impl MemoryRepository {
        fn check(&self) -> Result<(), RepositoryError> {
            if self.broken {
                return Err(RepositoryError::Connection("closed".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MachineRepository for MemoryRepository {
        async fn create_machine(
            &self,
            machine: NewMachineRecord,
        ) -> Result<MachineRecord, RepositoryError> {
            self.check()?;
            let mut machines = self.machines.lock().unwrap();
            let now = Utc::now();
            let record = MachineRecord {
                id: machines.len() as i64 + 1,
                machine_name: machine.machine_name,
                input: machine.input,
                output: machine.output,
                created_at: now,
                updated_at: now,
            };
            machines.push(record.clone());
            Ok(record)
        }

        async fn get_machine(
            &self,
            id: i64,
        ) -> Result<MachineRecord, RepositoryError> {
            self.check()?;
            self.machines
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn get_machine_by_name(
            &self,
            machine_name: &str,
        ) -> Result<MachineRecord, RepositoryError> {
            self.check()?;
            self.machines
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.machine_name == machine_name)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn update_machine(
            &self,
            machine: &MachineRecord,
        ) -> Result<(), RepositoryError> {
            self.check()?;
            let mut machines = self.machines.lock().unwrap();
            let stored = machines
                .iter_mut()
                .find(|m| m.id == machine.id)
                .ok_or(RepositoryError::NotFound)?;
            stored.input = machine.input.clone();
            stored.output = machine.output.clone();
            stored.updated_at = Utc::now();
            Ok(())
        }

        async fn delete_machine(
            &self,
            id: i64,
        ) -> Result<(), RepositoryError> {
            self.check()?;
            self.machines.lock().unwrap().retain(|m| m.id != id);
            Ok(())
        }

        async fn list_machines(&self) -> Result<Vec<MachineRecord>, RepositoryError> {
            self.check()?;
            Ok(self.machines.lock().unwrap().clone())
        }
    }

    fn tooling_input(tool_cost_per_month: rust_decimal::Decimal) -> MachineInput {
        let mut input = MachineInput::default();
        input.investment.working_hours_per_day = dec!(8);
        input.labor = LaborInput {
            tool_cost_per_month,
            ..Default::default()
        };
        input
    }

    #[tokio::test]
    async fn creates_machine_when_name_is_new() {
        let repo = MemoryRepository::default();
        let calculator = MachineHourRateCalculator::default();

        let (record, action) = save_machine(&repo, &calculator, "Press", tooling_input(dec!(2400)))
            .await
            .unwrap();

        assert_eq!(action, SaveAction::Created);
        assert_eq!(record.id, 1);
        assert_eq!(
            record.output.map(|o| round_half_up(o.machine_hour_rate)),
            Some(dec!(10.00))
        );
    }

    #[tokio::test]
    async fn replaces_machine_with_same_name() {
        let repo = MemoryRepository::default();
        let calculator = MachineHourRateCalculator::default();
        let (first, _) = save_machine(&repo, &calculator, "Press", tooling_input(dec!(2400)))
            .await
            .unwrap();

        let (second, action) = save_machine(&repo, &calculator, "Press", tooling_input(dec!(4800)))
            .await
            .unwrap();

        assert_eq!(action, SaveAction::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.input.labor.tool_cost_per_month, dec!(4800));
        assert_eq!(second.output.map(|o| o.tool_cost), Some(dec!(20)));
        assert_eq!(repo.list_machines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn different_names_create_separate_machines() {
        let repo = MemoryRepository::default();
        let calculator = MachineHourRateCalculator::default();

        save_machine(&repo, &calculator, "Press", MachineInput::default())
            .await
            .unwrap();
        let (record, action) = save_machine(&repo, &calculator, "Lathe", MachineInput::default())
            .await
            .unwrap();

        assert_eq!(action, SaveAction::Created);
        assert_eq!(record.id, 2);
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let repo = MemoryRepository {
            broken: true,
            ..Default::default()
        };
        let calculator = MachineHourRateCalculator::default();

        let result = save_machine(&repo, &calculator, "Press", MachineInput::default()).await;

        assert_eq!(
            result.err(),
            Some(RepositoryError::Connection("closed".to_string()))
        );
    }

    #[tokio::test]
    async fn accepts_boxed_repository() {
        let repo: Box<dyn MachineRepository> = Box::new(MemoryRepository::default());
        let calculator = MachineHourRateCalculator::default();

        let (_, action) = save_machine(&*repo, &calculator, "Press", MachineInput::default())
            .await
            .unwrap();

        assert_eq!(action, SaveAction::Created);
    }
}
