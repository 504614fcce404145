//! 儀表板使用的靜態指標表。數值為官方發佈值，不得修改。

pub mod consistency;
pub mod fertility;
pub mod migration;
pub mod mortality;
pub mod population;

use crate::domain::model::{
    AgeGroupRow, AgeValueRow, CauseOfDeathRow, CountRow, Discrepancy, FemaleBirthsRow,
    FemalePopulationRow, MasculinityEffectRow, MunicipalityMigrationRow, SettlementRow,
    SexBreakdownRow,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Datasets {
    pub age_groups: Vec<AgeGroupRow>,
    pub settlements: Vec<SettlementRow>,
    pub crude_death_rates: Vec<SexBreakdownRow>,
    pub mortality_rates: mortality::AgeSpecificRates,
    pub causes_of_death: Vec<CauseOfDeathRow>,
    pub infant_mortality: Vec<CountRow>,
    pub child_mortality: Vec<CountRow>,
    pub child_mortality_0_4: Vec<CountRow>,
    pub births_by_mother_age: Vec<AgeValueRow>,
    pub age_specific_fertility: Vec<AgeValueRow>,
    pub female_population: Vec<FemalePopulationRow>,
    pub female_births: Vec<FemaleBirthsRow>,
    pub net_reproduction: Vec<AgeValueRow>,
    pub migration: Vec<MunicipalityMigrationRow>,
    pub masculinity: Vec<MasculinityEffectRow>,
}

impl Datasets {
    /// 安蒂奧基亞省的全部資料表
    pub fn antioquia() -> Self {
        Self {
            age_groups: population::age_groups(),
            settlements: population::settlements(),
            crude_death_rates: mortality::crude_death_rates(),
            mortality_rates: mortality::age_specific_rates(),
            causes_of_death: mortality::causes_of_death(),
            infant_mortality: mortality::infant_mortality(),
            child_mortality: mortality::child_mortality(),
            child_mortality_0_4: mortality::child_mortality_0_4(),
            births_by_mother_age: fertility::births_by_mother_age(),
            age_specific_fertility: fertility::age_specific_fertility(),
            female_population: fertility::female_population(),
            female_births: fertility::female_births(),
            net_reproduction: fertility::net_reproduction(),
            migration: migration::municipalities(),
            masculinity: migration::masculinity_effects(),
        }
    }

    /// 不含 TOTAL 列的市鎮資料
    pub fn municipalities(&self) -> Vec<&MunicipalityMigrationRow> {
        self.migration
            .iter()
            .filter(|r| r.name != migration::TOTAL_LABEL)
            .collect()
    }

    pub fn total_population(&self) -> Option<i64> {
        self.age_groups
            .iter()
            .find(|r| r.age_band == population::TOTAL_LABEL)
            .map(|r| r.total)
    }

    /// 執行所有一致性檢查
    pub fn check_consistency(&self) -> Vec<Discrepancy> {
        let mut found =
            consistency::check_population_totals(&self.age_groups, population::TOTAL_LABEL);
        found.extend(consistency::check_migration_consistency(&self.migration));
        found
    }
}
