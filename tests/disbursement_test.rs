use payroll_disburser::application::balance::{BalanceQuery, BalanceReport};
use payroll_disburser::application::disburser::Disburser;
use payroll_disburser::application::resolver::AccountResolver;
use payroll_disburser::config::{Credentials, Settings};
use payroll_disburser::domain::address::Address;
use payroll_disburser::domain::balance::TokenBalanceRecord;
use payroll_disburser::domain::payment::PayrollSummary;
use payroll_disburser::domain::ports::WalletServiceRef;
use payroll_disburser::infrastructure::in_memory::InMemoryWallet;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

mod common;

fn credentials() -> Option<Credentials> {
    Some(Credentials {
        key_id: "test-key".into(),
        key_secret: "test-secret".into(),
    })
}

fn disburser(wallet: &InMemoryWallet, settings: &Settings) -> Disburser {
    let wallet: WalletServiceRef = Arc::new(wallet.clone());
    let resolver = AccountResolver::new(Arc::clone(&wallet), settings.account_name.clone(), None);
    Disburser::new(wallet, resolver, settings.token().unwrap(), settings.network())
        .with_pacing(Duration::from_millis(0))
}

#[tokio::test]
async fn test_payroll_with_one_rejected_transfer() {
    let settings = Settings::from_map(HashMap::new()).unwrap();
    let wallet = InMemoryWallet::new();
    let employees = vec![
        common::employee(1, dec!(5000)),
        common::employee(2, dec!(1250.5)),
        common::employee(3, dec!(0.75)),
    ];
    wallet
        .reject_transfers_to(employees[1].address.parse::<Address>().unwrap())
        .await;

    let disburser = Arc::new(disburser(&wallet, &settings));
    let handle = {
        let disburser = Arc::clone(&disburser);
        let employees = employees.clone();
        tokio::spawn(async move { disburser.pay_all(&employees).await })
    };
    let results = handle.await.unwrap().unwrap();

    let ids: Vec<u32> = results.iter().map(|r| r.employee_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].transaction_hash.is_empty());
    assert!(results[1].error.is_some());
    assert!(results[2].success);
    assert_eq!(wallet.send_calls(), 3);

    let summary = PayrollSummary::from_results(&employees, &results);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);

    let submitted = wallet.submitted().await;
    assert_eq!(submitted.len(), 2);
    let from = disburser.account_address().unwrap();
    assert!(submitted.iter().all(|request| request.from == from));
    assert!(submitted.iter().all(|request| request.value == 0));
    assert!(
        submitted
            .iter()
            .all(|request| request.to == settings.token().unwrap().contract)
    );
}

#[tokio::test]
async fn test_balance_is_readable_while_paying() {
    let settings = Settings::from_map(HashMap::new()).unwrap();
    let wallet = InMemoryWallet::new();
    let disburser = disburser(&wallet, &settings);
    let account = disburser.account().await.unwrap().clone();
    let token = settings.token().unwrap();
    wallet
        .set_balances(
            account.address,
            settings.network(),
            vec![TokenBalanceRecord {
                symbol: token.symbol.clone(),
                contract_address: token.contract,
                raw_amount: "6715000".into(),
                decimals: token.decimals,
            }],
        )
        .await;

    let query = BalanceQuery::new(Arc::new(wallet.clone()), credentials());
    let employees = vec![common::employee(1, dec!(1)), common::employee(2, dec!(2))];
    let network = settings.network();
    let (paid, report) = tokio::join!(
        disburser.pay_all(&employees),
        query.report(&account.address, &network, &token.symbol)
    );

    assert_eq!(paid.unwrap().len(), 2);
    assert_eq!(
        report,
        BalanceReport::Available {
            balance: "6.715000".into()
        }
    );
    assert_eq!(wallet.account_calls(), 1);
}

#[tokio::test]
async fn test_balance_on_another_network_is_zero() {
    let settings = Settings::from_map(HashMap::from([(
        "PAYROLL_NETWORK".to_string(),
        "base".to_string(),
    )]))
    .unwrap();
    let wallet = InMemoryWallet::new();
    let address: Address = "0x4f53d06DE83CB8f2eaF8B2AAb647983Dcb496b1E".parse().unwrap();
    wallet
        .set_balances(
            address,
            payroll_disburser::domain::transaction::Network::new("base-sepolia"),
            vec![TokenBalanceRecord {
                symbol: "USDC".into(),
                contract_address: settings.token().unwrap().contract,
                raw_amount: "1000000".into(),
                decimals: 6,
            }],
        )
        .await;

    let query = BalanceQuery::new(Arc::new(wallet), credentials());
    let balance = query
        .fetch(&address, &settings.network(), &settings.token_symbol)
        .await
        .unwrap();
    assert_eq!(balance, "0");
}
