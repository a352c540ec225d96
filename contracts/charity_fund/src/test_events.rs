extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, Symbol, TryIntoVal, Val, Vec,
};

use crate::{CharityFund, CharityFundClient, FundDeposited, FundsTransferred, THRESHOLD};

fn setup() -> (Env, CharityFundClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let token_addr = sac.address();

    let contract_id = env.register(CharityFund, ());
    let client = CharityFundClient::new(&env, &contract_id);
    client.init(&owner, &token_addr);

    (env, client, owner, token_addr)
}

fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token).mint(to, &amount);
}

/// Events published by the charity fund contract itself; the SAC token
/// publishes its own transfer events, which these tests skip over.
fn contract_events(env: &Env, contract: &Address) -> std::vec::Vec<(Vec<Val>, Val)> {
    env.events()
        .all()
        .iter()
        .filter(|(addr, _, _)| addr == contract)
        .map(|(_, topics, data)| (topics, data))
        .collect()
}

#[test]
fn deposit_emits_typed_payload() {
    let (env, client, _owner, token) = setup();
    let donor = Address::generate(&env);
    mint(&env, &token, &donor, 200_000);

    client.deposit(&donor, &200_000);

    let events = contract_events(&env, &client.address);
    let (topics, data) = events.last().expect("no contract event published");

    let expected_topics = vec![&env, symbol_short!("deposited").into_val(&env)];
    assert_eq!(topics, &expected_topics);

    let payload: FundDeposited = data.try_into_val(&env).unwrap();
    assert_eq!(
        payload,
        FundDeposited {
            donor: donor.clone(),
            amount: 200_000,
        }
    );
}

#[test]
fn settlement_emits_deposit_then_transfer() {
    let (env, client, owner, token) = setup();
    let donor = Address::generate(&env);
    mint(&env, &token, &donor, THRESHOLD);

    client.deposit(&donor, &THRESHOLD);

    let events = contract_events(&env, &client.address);
    assert!(events.len() >= 2, "expected deposit + transfer events");

    let (deposit_topics, deposit_data) = &events[events.len() - 2];
    let expected_deposit_topics = vec![&env, symbol_short!("deposited").into_val(&env)];
    assert_eq!(deposit_topics, &expected_deposit_topics);
    let deposited: FundDeposited = deposit_data.try_into_val(&env).unwrap();
    assert_eq!(deposited.donor, donor);
    assert_eq!(deposited.amount, THRESHOLD);

    let (transfer_topics, transfer_data) = &events[events.len() - 1];
    let expected_transfer_topics =
        vec![&env, Symbol::new(&env, "transferred").into_val(&env)];
    assert_eq!(transfer_topics, &expected_transfer_topics);
    let transferred: FundsTransferred = transfer_data.try_into_val(&env).unwrap();
    assert_eq!(
        transferred,
        FundsTransferred {
            recipient: owner.clone(),
            amount: THRESHOLD,
        }
    );
}

#[test]
fn no_transfer_event_below_threshold() {
    let (env, client, _owner, token) = setup();
    let donor = Address::generate(&env);
    mint(&env, &token, &donor, 400_000);

    client.deposit(&donor, &200_000);
    client.deposit(&donor, &200_000);

    let events = contract_events(&env, &client.address);
    let transferred_topic = Symbol::new(&env, "transferred");
    for (topics, _) in &events {
        let leading: Symbol = topics.get(0).expect("empty topics").try_into_val(&env).unwrap();
        assert_ne!(leading, transferred_topic, "settlement fired below threshold");
    }

    let (last_topics, _) = events.last().expect("no contract event published");
    let expected_deposit_topics = vec![&env, symbol_short!("deposited").into_val(&env)];
    assert_eq!(last_topics, &expected_deposit_topics);
}

#[test]
fn transfer_event_reports_swept_balance() {
    let (env, client, owner, token) = setup();
    let donor = Address::generate(&env);
    mint(&env, &token, &donor, THRESHOLD);

    // Stray tokens on the contract address inflate the sweep.
    mint(&env, &token, &client.address, 30_000);

    client.deposit(&donor, &THRESHOLD);

    let events = contract_events(&env, &client.address);
    let (_, transfer_data) = events.last().expect("no settlement event");
    let transferred: FundsTransferred = transfer_data.try_into_val(&env).unwrap();

    assert_eq!(transferred.recipient, owner);
    assert_eq!(transferred.amount, THRESHOLD + 30_000);
}
