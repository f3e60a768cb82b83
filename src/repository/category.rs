use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategoryName, Sequence};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::ordering::SequenceUpdate;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order((categories::display_order.asc(), categories::created_at.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        category: &NewCategory,
        sequence: Sequence,
    ) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = category.clone().into_category(CategoryId::generate(), sequence);

        diesel::insert_into(categories::table)
            .values(DbNewCategory::from(&category))
            .execute(&mut conn)?;

        Ok(category)
    }

    fn rename_category(&self, id: &CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.filter(categories::id.eq(id.as_str())))
            .set((
                categories::name.eq(name.as_str()),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_category_sequences(
        &self,
        updates: &[SequenceUpdate<CategoryId>],
    ) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            for update in updates {
                let affected = diesel::update(
                    categories::table.filter(categories::id.eq(update.id.as_str())),
                )
                .set(categories::display_order.eq(update.to.get()))
                .execute(conn)?;
                if affected == 0 {
                    return Err(RepositoryError::NotFound);
                }
            }
            Ok(())
        })
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(categories::table.filter(categories::id.eq(id.as_str())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
