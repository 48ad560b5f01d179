use mortgage_cot::{
    calculate_affordability, payment_breakdown, AffordError, AffordabilityRequest,
    AffordabilityStatus,
};

fn reference() -> AffordabilityRequest {
    AffordabilityRequest::new(120_000.0, 600.0, 420_000.0)
        .with_down_payment_percent(20.0)
        .with_rate(6.5)
        .with_term_years(30)
        .with_dti_limit(0.43)
}

#[test]
fn test_defaults_match_documented_terms() {
    let request = AffordabilityRequest::new(120_000.0, 600.0, 420_000.0);
    assert_eq!(request.down_payment_percent, 20.0);
    assert_eq!(request.annual_rate_percent, 6.5);
    assert_eq!(request.term_years, 30);
    assert_eq!(request.dti_limit, 0.43);
    assert_eq!(request.property_tax_rate_percent, 1.2);
    assert_eq!(request.home_insurance_rate_percent, 0.5);
    assert_eq!(request, reference());
}

#[test]
fn test_reference_scenario_is_affordable() {
    let result = calculate_affordability(&reference()).unwrap();

    // 336000 @ 6.5% / 360 期的閉式年金公式
    assert!((result.estimated_monthly_payment - 2718.75).abs() < 0.01);
    assert!((result.max_monthly_budget - 3700.0).abs() < 1e-9);
    assert_eq!(result.status, AffordabilityStatus::Affordable);
    assert_eq!(result.status.to_string(), "affordable");
}

#[test]
fn test_payment_increases_with_rate() {
    let mut previous = f64::MIN;
    for rate in [0.0, 0.5, 2.0, 4.25, 6.5, 9.0, 14.0] {
        let payment = calculate_affordability(&reference().with_rate(rate))
            .unwrap()
            .estimated_monthly_payment;
        assert!(payment > previous, "rate {} did not increase payment", rate);
        previous = payment;
    }
}

#[test]
fn test_payment_decreases_with_down_payment() {
    let mut previous = f64::MAX;
    for down in [0.0, 3.5, 10.0, 20.0, 50.0, 99.0] {
        let payment = calculate_affordability(&reference().with_down_payment_percent(down))
            .unwrap()
            .estimated_monthly_payment;
        assert!(payment < previous, "down payment {} did not decrease payment", down);
        previous = payment;
    }
}

#[test]
fn test_principal_and_interest_decreases_with_term() {
    let mut previous = f64::MAX;
    for term in [5, 10, 15, 20, 30, 40, 100] {
        let breakdown = payment_breakdown(&reference().with_term_years(term)).unwrap();
        assert!(breakdown.principal_and_interest < previous);
        // 期數再長也不會低於純利息
        assert!(breakdown.principal_and_interest > breakdown.loan_amount * breakdown.monthly_rate);
        previous = breakdown.principal_and_interest;
    }
}

#[test]
fn test_zero_rate_ten_years_is_loan_over_120() {
    let breakdown = payment_breakdown(&reference().with_rate(0.0).with_term_years(10)).unwrap();
    assert_eq!(breakdown.n_payments, 120);
    assert_eq!(breakdown.principal_and_interest, 336_000.0 / 120.0);
}

#[test]
fn test_zero_rate_term_lower_bound_is_linear() {
    for term in [1, 7, 30] {
        let breakdown = payment_breakdown(&reference().with_rate(0.0).with_term_years(term)).unwrap();
        assert_eq!(
            breakdown.principal_and_interest,
            breakdown.loan_amount / f64::from(term * 12)
        );
    }
}

#[test]
fn test_debt_above_ceiling_gives_negative_budget() {
    let request = AffordabilityRequest::new(48_000.0, 2_500.0, 150_000.0);
    let result = calculate_affordability(&request).unwrap();

    assert!(result.max_monthly_budget < 0.0);
    assert_eq!(result.status, AffordabilityStatus::NotAffordable);
}

#[test]
fn test_repeated_calls_are_identical() {
    let request = reference().with_rate(7.125).with_term_years(20);
    let first = calculate_affordability(&request).unwrap();
    let second = calculate_affordability(&request).unwrap();

    assert_eq!(
        first.estimated_monthly_payment.to_bits(),
        second.estimated_monthly_payment.to_bits()
    );
    assert_eq!(
        first.max_monthly_budget.to_bits(),
        second.max_monthly_budget.to_bits()
    );
    assert_eq!(first.status, second.status);
}

#[test]
fn test_rejects_invalid_inputs() {
    let invalid = [
        ("home_price", AffordabilityRequest::new(120_000.0, 600.0, 0.0)),
        ("term_years", reference().with_term_years(0)),
        ("down_payment_percent", reference().with_down_payment_percent(150.0)),
        ("dti_limit", reference().with_dti_limit(0.0)),
        ("dti_limit", reference().with_dti_limit(1.5)),
        ("annual_income", AffordabilityRequest::new(f64::NAN, 600.0, 420_000.0)),
        ("property_tax_rate_percent", reference().with_property_tax_rate(-1.0)),
    ];

    for (expected_field, request) in invalid {
        match calculate_affordability(&request) {
            Err(AffordError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput for {}, got {:?}", expected_field, other),
        }
    }
}

#[test]
fn test_concurrent_callers_agree() {
    let expected = calculate_affordability(&reference()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| calculate_affordability(&reference()).unwrap()))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
