// File: src/catalog/mod.rs
// Purpose: The rule-category predicate catalogue and its engine dispatch

use chrono::NaiveDate;

use formcheck_checksum::{
    is_valid_excise_reference, is_valid_payment_card, is_valid_tax_reference,
    is_valid_vat_registration,
};

use crate::engine::{validate_fields, Pass};
use crate::form::Form;
use crate::presenter::ErrorPresenter;
use crate::registry::RuleRegistry;
use crate::rule::Category;

pub mod date;
pub mod expression;
pub mod numeric;
pub mod text;

/// Runs one rule category through the engine with its catalogue predicate.
///
/// `today` anchors the relative date-range offsets; the orchestrator
/// defaults it to the system date and lets callers pin it.
pub fn run_category(
    form: &Form,
    registry: &RuleRegistry,
    category: Category,
    today: NaiveDate,
    pass: &mut Pass,
    presenter: &mut dyn ErrorPresenter,
) -> bool {
    let run = |pass: &mut Pass,
               presenter: &mut dyn ErrorPresenter,
               is_valid: &dyn Fn(&crate::value::FieldValue, &crate::rule::Rule) -> bool| {
        validate_fields(form, registry, category, pass, presenter, is_valid)
    };

    match category {
        Category::Required => run(pass, presenter, &|value, _| text::required(value)),

        Category::Byte => run(pass, presenter, &|value, _| numeric::byte(&value.join())),

        Category::Short => run(pass, presenter, &|value, _| numeric::short(&value.join())),

        Category::Int => run(pass, presenter, &|value, _| numeric::int(&value.join())),

        Category::Long => run(pass, presenter, &|value, _| numeric::long(&value.join())),

        Category::Float | Category::Double => {
            run(pass, presenter, &|value, _| numeric::float(&value.join()))
        }

        Category::IntRange => run(pass, presenter, &|value, rule| {
            numeric::int_range(&value.join(), rule)
        }),

        Category::FloatRange | Category::DoubleRange => run(pass, presenter, &|value, rule| {
            numeric::float_range(&value.join(), rule)
        }),

        Category::Mask => run(pass, presenter, &|value, rule| {
            text::mask(&value.join(), rule)
        }),

        Category::MinLength => run(pass, presenter, &|value, rule| {
            text::min_length(&value.join(), rule)
        }),

        Category::MaxLength => run(pass, presenter, &|value, rule| {
            text::max_length(&value.join(), rule)
        }),

        Category::Date => run(pass, presenter, &|value, rule| {
            date::date(&value.join(), rule)
        }),

        Category::DateRange => run(pass, presenter, &|value, rule| {
            date::date_range(&value.join(), rule, today)
        }),

        Category::CrossFieldMask => run(pass, presenter, &|value, rule| {
            text::cross_field_mask(form, &value.join(), rule)
        }),

        Category::RequireAtLeastOne => run(pass, presenter, &|_, rule| {
            text::require_at_least_one(form, rule)
        }),

        Category::ElExpression => run(pass, presenter, &|_, rule| {
            expression::el_expression(form, rule)
        }),

        Category::ValidWhen => run(pass, presenter, &|value, rule| {
            expression::valid_when(form, value, rule)
        }),

        Category::CreditCard => run(pass, presenter, &|value, _| {
            is_valid_payment_card(&value.join())
        }),

        Category::TaxReference => run(pass, presenter, &|value, _| {
            let value = value.join();
            value.is_empty() || is_valid_tax_reference(&value)
        }),

        Category::ExciseReference => run(pass, presenter, &|value, _| {
            is_valid_excise_reference(&value.join())
        }),

        Category::VatRegistration => run(pass, presenter, &|value, _| {
            is_valid_vat_registration(&value.join())
        }),

        Category::Email => run(pass, presenter, &|value, _| text::email(&value.join())),
    }
}
